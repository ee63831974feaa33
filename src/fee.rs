//! Protocol fee computation and settlement for authorized casts.

use crate::{
    chain::{CallContext, Chain},
    constants::FEE_PERCENTAGE_DIVISOR,
    error::FeeError,
    registry::{FeeConfig, FeeMode},
    types::{Event, Operation},
};
use alloy::primitives::{Address, Bytes, U256};
use tracing::{debug, warn};

/// Computes and settles the protocol fee of authorized casts.
#[derive(Debug)]
pub struct FeeEngine;

impl FeeEngine {
    /// Computes the fee for a cast: the mode's raw fee clamped to the
    /// configured `[min, max]` band (`max = 0` is unbounded).
    ///
    /// Synthetic gas is deterministic, so this runs before dispatch and the
    /// caller can reject the cast against its `maxFee` ceiling with nothing
    /// consumed.
    pub fn compute(config: &FeeConfig, gas_used: u64, gas_price: U256) -> Result<U256, FeeError> {
        let mut fee = match config.mode {
            FeeMode::Percentage => {
                U256::from(gas_used) * gas_price * config.value / U256::from(FEE_PERCENTAGE_DIVISOR)
            }
            FeeMode::Fixed => config.value,
        };

        if fee < config.min {
            fee = config.min;
        }
        if !config.max.is_zero() && fee > config.max {
            fee = config.max;
        }

        if !fee.is_zero() && config.collector.is_zero() {
            return Err(FeeError::InvalidFeeParams("fee configured without a collector"));
        }
        Ok(fee)
    }

    /// Transfers `fee` from the account to the collector.
    ///
    /// The collector is paid through a real call frame so collector
    /// contracts can reject; a rejected payment falls back to the backup
    /// collector. Settlement never fails the cast — when even the fallback
    /// cannot be paid (account out of funds), the fee is skipped with a
    /// warning. `FeePaid` is the last event of the transaction when a fee
    /// was collected.
    pub fn settle(chain: &mut Chain, account: Address, fee: U256, config: &FeeConfig) {
        if fee.is_zero() {
            return;
        }

        let snapshot = chain.snapshot();
        match chain.execute_frame(
            config.collector,
            CallContext {
                caller: account,
                this: config.collector,
                value: fee,
                data: Bytes::new(),
                operation: Operation::Call,
            },
        ) {
            Ok(_) => {
                chain.emit(Event::FeePaid { account, amount: fee, collector: config.collector });
            }
            Err(err) => {
                chain.revert_to(snapshot);
                debug!(%err, collector = %config.collector, "fee collector rejected payment, falling back");
                match chain.transfer(account, config.backup_collector, fee) {
                    Ok(()) => chain.emit(Event::FeePaid {
                        account,
                        amount: fee,
                        collector: config.backup_collector,
                    }),
                    Err(err) => warn!(%err, %account, "fee payment skipped"),
                }
            }
        }
    }
}
