//! # Transfer Requests
//!
//! Admission control between two onboarded users. A transfer that fails any
//! limit check is never forwarded; one that passes goes out on
//! `TRANSACTIONCREATEREQUEST` addressed to the receiver's default badge.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shared_bus::{MessageHandler, MessageStream, Transport};
    use shared_types::{EventEnvelope, Tier};

    use service_runtime::{ServiceConfig, ServiceContainer};
    use ws_01_user_accounts::{
        AccountError, AdmissionError, BalanceUpdate, TransactionMetadata, TransactionRequest,
        UserAccountsApi, UserBadgeRequest,
    };

    use crate::integration::support::{claim, next_event, validated, PHONE};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Transfer {
        container: Arc<ServiceContainer>,
        forwarded: MessageStream,
        receiver_badge: String,
    }

    fn tier(sending: f64, receiving: f64, wallet: f64) -> Tier {
        Tier {
            tier_reference: "tier-1".into(),
            tier_name: "Tier 1".into(),
            sending_limit: sending,
            receiving_limit: receiving,
            wallet_limit: wallet,
            ..Default::default()
        }
    }

    async fn onboard(container: &ServiceContainer, user_reference: &str, available: f64, tier: Tier) {
        let envelope =
            EventEnvelope::from_slice(&validated("create_user", user_reference, PHONE)).unwrap();
        container
            .otp_validated_handler()
            .handle(envelope)
            .await
            .unwrap();

        let owner = claim(user_reference);
        container
            .accounts
            .update_balance(
                user_reference,
                BalanceUpdate {
                    book_amount: available,
                    available_amount: available,
                },
                &owner,
            )
            .await
            .unwrap();
        container
            .accounts
            .update_tier(user_reference, tier, &owner)
            .await
            .unwrap();
    }

    /// Sender `u-1` holding 1,000 and receiver `u-2` holding 100 with a badge.
    async fn transfer(receiver_tier: Tier) -> Transfer {
        let container = Arc::new(ServiceContainer::new(ServiceConfig::default()));
        onboard(&container, "u-1", 1_000.0, tier(500.0, 5_000.0, 10_000.0)).await;
        onboard(&container, "u-2", 100.0, receiver_tier).await;

        let receiver_badge = container
            .accounts
            .create_user_badge(
                "u-2",
                UserBadgeRequest {
                    walls_tag: "bisi".into(),
                    wallet_reference: "w-2".into(),
                    user_reference: "u-2".into(),
                },
                &claim("u-2"),
            )
            .await
            .unwrap();

        let forwarded = container.transport.subscribe("TRANSACTIONCREATEREQUEST").unwrap();
        Transfer {
            container,
            forwarded,
            receiver_badge,
        }
    }

    fn request(amount: f64) -> TransactionRequest {
        TransactionRequest {
            transaction_type: "wallet_wallet".into(),
            amount,
            sender_reference: "u-1".into(),
            out_reference: "w-1".into(),
            receiver_reference: "u-2".into(),
            in_reference: "w-2".into(),
            receiver_walls_badge_reference: None,
            metadata: TransactionMetadata {
                note: "lunch".into(),
                ..Default::default()
            },
        }
    }

    // =============================================================================
    // ADMITTED
    // =============================================================================

    #[tokio::test]
    async fn test_admitted_transfer_is_forwarded_to_default_badge() {
        let mut transfer = transfer(tier(500.0, 5_000.0, 10_000.0)).await;

        let request_reference = transfer
            .container
            .accounts
            .create_transaction_request("u-1", request(250.0), &claim("u-1"))
            .await
            .unwrap();

        let (channel, envelope) = next_event(&mut transfer.forwarded)
            .await
            .expect("forwarded transfer");
        assert_eq!(channel, "TRANSACTIONCREATEREQUEST");
        assert_eq!(envelope.event_name, "createtransactionrequestevent");

        let data = &envelope.event_data;
        assert_eq!(data["request_reference"], request_reference.as_str());
        assert_eq!(data["amount"], 250.0);
        assert_eq!(data["sender"]["type"], "wallet_wallet");
        assert_eq!(data["sender"]["user_reference"], "u-1");
        assert_eq!(data["receiver"]["user_reference"], "u-2");
        assert_eq!(
            data["receiver"]["wallsbadge_reference"],
            transfer.receiver_badge.as_str()
        );
        assert_eq!(data["metadata"]["note"], "lunch");
    }

    #[tokio::test]
    async fn test_explicit_badge_overrides_default() {
        let mut transfer = transfer(tier(500.0, 5_000.0, 10_000.0)).await;
        let mut explicit = request(10.0);
        explicit.receiver_walls_badge_reference = Some("badge-other".into());

        transfer
            .container
            .accounts
            .create_transaction_request("u-1", explicit, &claim("u-1"))
            .await
            .unwrap();

        let (_, envelope) = next_event(&mut transfer.forwarded).await.expect("forwarded");
        assert_eq!(envelope.event_data["receiver"]["wallsbadge_reference"], "badge-other");
    }

    // =============================================================================
    // REJECTED
    // =============================================================================

    #[tokio::test]
    async fn test_each_limit_rejects_without_forwarding() {
        let cases: [(f64, Tier, fn(&AdmissionError) -> bool); 4] = [
            // More than the sender holds.
            (1_500.0, tier(500.0, 5_000.0, 10_000.0), |e| {
                matches!(e, AdmissionError::InsufficientFunds { .. })
            }),
            // Above the sender's sending limit.
            (600.0, tier(500.0, 5_000.0, 10_000.0), |e| {
                matches!(e, AdmissionError::SendingLimitExceeded { .. })
            }),
            // Receiver would end above its wallet limit.
            (200.0, tier(500.0, 5_000.0, 250.0), |e| {
                matches!(e, AdmissionError::WalletLimitExceeded { .. })
            }),
            // Receiver already holds more than its receiving limit.
            (10.0, tier(500.0, 50.0, 10_000.0), |e| {
                matches!(e, AdmissionError::ReceivingLimitExceeded { .. })
            }),
        ];

        for (amount, receiver_tier, expected) in cases {
            let mut transfer = transfer(receiver_tier).await;

            let err = transfer
                .container
                .accounts
                .create_transaction_request("u-1", request(amount), &claim("u-1"))
                .await
                .unwrap_err();

            match &err {
                AccountError::Admission(rejection) => assert!(expected(rejection), "{rejection}"),
                other => panic!("expected admission rejection, got {other}"),
            }
            assert!(next_event(&mut transfer.forwarded).await.is_none());
        }
    }

    #[tokio::test]
    async fn test_sender_must_be_caller() {
        let mut transfer = transfer(tier(500.0, 5_000.0, 10_000.0)).await;

        let err = transfer
            .container
            .accounts
            .create_transaction_request("u-1", request(10.0), &claim("u-2"))
            .await
            .unwrap_err();

        assert!(err.is_authorization());
        assert!(next_event(&mut transfer.forwarded).await.is_none());
    }

    #[tokio::test]
    async fn test_missing_receiver_is_not_found() {
        let mut transfer = transfer(tier(500.0, 5_000.0, 10_000.0)).await;
        let mut orphan = request(10.0);
        orphan.receiver_reference = "u-404".into();

        let err = transfer
            .container
            .accounts
            .create_transaction_request("u-1", orphan, &claim("u-1"))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(next_event(&mut transfer.forwarded).await.is_none());
    }
}
