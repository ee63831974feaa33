mod batch;
mod signers;
