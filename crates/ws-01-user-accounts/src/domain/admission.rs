//! # Transaction Admission Control
//!
//! Limit checks applied before a transfer request is forwarded to the
//! ledger. This service never moves money; it only gates the request.
//!
//! | Order | Check | Side |
//! |-------|-------|------|
//! | 1 | available balance covers amount | sender |
//! | 2 | amount within tier sending limit | sender |
//! | 3 | resulting balance within tier wallet limit | receiver |
//! | 4 | current balance within tier receiving limit | receiver |
//!
//! Check 4 looks at the receiver's balance *before* the amount is added.

use shared_types::User;

use super::errors::AdmissionError;

/// Run the limit checks in order, stopping at the first failure.
pub fn admit(sender: &User, receiver: &User, amount: f64) -> Result<(), AdmissionError> {
    let sender_balance = sender.wallet.balance.available_amount;
    let sender_tier = &sender.wallet.tier;
    let receiver_balance = receiver.wallet.balance.available_amount;
    let receiver_tier = &receiver.wallet.tier;

    if sender_balance < amount {
        return Err(AdmissionError::InsufficientFunds {
            available: sender_balance,
            amount,
        });
    }

    if amount > sender_tier.sending_limit {
        return Err(AdmissionError::SendingLimitExceeded {
            amount,
            limit: sender_tier.sending_limit,
        });
    }

    let resulting = receiver_balance + amount;
    if resulting > receiver_tier.wallet_limit {
        return Err(AdmissionError::WalletLimitExceeded {
            resulting,
            limit: receiver_tier.wallet_limit,
        });
    }

    if receiver_balance > receiver_tier.receiving_limit {
        return Err(AdmissionError::ReceivingLimitExceeded {
            balance: receiver_balance,
            limit: receiver_tier.receiving_limit,
        });
    }

    Ok(())
}
