//! # OTP Flow
//!
//! The handshake end to end: an OTP request goes out on the bus, the
//! verifier's validated event comes back in through the runtime's
//! subscriber loop and lands on the user aggregate.
//!
//! ## Flow Tested
//!
//! ```text
//! request_otp ──OTPREQUESTCREATEDEVENT:CREATE_USER──→ verifier
//! verifier ──OTPVALIDATEDEVENT:CREATE_USER──→ Dispatcher → OtpValidatedHandler
//!                                                         → USERCREATEDEVENT
//! ```

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use shared_bus::{
        BusError, ChannelRegistry, Dispatcher, InboundMessage, MessageHandler, Transport,
        OTP_VALIDATED,
    };
    use shared_types::EventEnvelope;
    use tokio::time::timeout;

    use service_runtime::{ServiceConfig, ServiceRuntime};
    use ws_01_user_accounts::UserRepository;
    use ws_02_otp_handshake::{OtpRequest, OtpValidatedHandler};

    use crate::integration::support::{
        claim, device, next_event, validated, wait_for_subscribers, PHONE,
    };

    // =============================================================================
    // OUTBOUND: OTP REQUESTS
    // =============================================================================

    #[tokio::test]
    async fn test_otp_request_for_new_account_is_published_with_sub_type() {
        let runtime = ServiceRuntime::new(ServiceConfig::default());
        let container = runtime.container();
        let mut requests = container.transport.subscribe("OTPREQUESTCREATEDEVENT*").unwrap();

        let reference = container
            .otp
            .request_otp(
                OtpRequest {
                    otp_type: "create_user".into(),
                    contact: PHONE.into(),
                    channel: "sms".into(),
                    device: device("u-1"),
                },
                &claim("u-1"),
            )
            .await
            .unwrap();
        assert_eq!(reference, "u-1");

        let (channel, envelope) = next_event(&mut requests).await.expect("otp request");
        assert_eq!(channel, "OTPREQUESTCREATEDEVENT:CREATE_USER");
        assert_eq!(envelope.event_name, "createotprequestevent");
        assert_eq!(envelope.event_type, "create_user");
        assert_eq!(envelope.event_source, "walls-user-service");
        assert_eq!(envelope.event_data["userReference"], "u-1");
        assert_eq!(envelope.event_data["contact"], PHONE);
    }

    #[tokio::test]
    async fn test_otp_request_with_mismatched_contact_publishes_nothing() {
        let runtime = ServiceRuntime::new(ServiceConfig::default());
        let container = runtime.container();
        // verify_email needs a bound caller, so the account must exist first.
        let handler = OtpValidatedHandler::new(container.accounts.clone());
        let envelope = EventEnvelope::from_slice(&validated("create_user", "u-1", PHONE)).unwrap();
        handler.handle(envelope).await.unwrap();

        let mut requests = container.transport.subscribe("OTPREQUESTCREATEDEVENT*").unwrap();
        let published_before = container.transport.messages_published();

        let err = container
            .otp
            .request_otp(
                OtpRequest {
                    otp_type: "verify_email".into(),
                    contact: PHONE.into(),
                    channel: "email".into(),
                    device: device("u-1"),
                },
                &claim("u-1"),
            )
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(container.transport.messages_published(), published_before);
        assert!(next_event(&mut requests).await.is_none());
    }

    // =============================================================================
    // INBOUND: VALIDATED OTP THROUGH THE RUNNING SERVICE
    // =============================================================================

    #[tokio::test]
    async fn test_redelivered_create_user_creates_one_user() {
        let mut runtime = ServiceRuntime::new(ServiceConfig::default());
        let container = runtime.container();
        let mut created = container.transport.subscribe("USERCREATEDEVENT").unwrap();

        runtime.start();
        // The observer above plus the runtime's own subscription.
        wait_for_subscribers(&container.transport, 2).await;

        for _ in 0..2 {
            container
                .transport
                .publish("OTPVALIDATEDEVENT:CREATE_USER", validated("create_user", "u-1", PHONE))
                .await
                .unwrap();
        }
        container
            .transport
            .publish("OTPVALIDATEDEVENT:VERIFY_PHONE", validated("verify_phone", "u-1", PHONE))
            .await
            .unwrap();

        // The loop handles messages in order, so once the phone flag is set
        // both create deliveries have been processed.
        timeout(Duration::from_secs(1), async {
            loop {
                if let Ok(user) = container.repository.get_user_by_reference("u-1").await {
                    if user.user_profile.is_verified_phone {
                        break;
                    }
                }
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("validated events applied");

        assert_eq!(container.repository.len().await, 1);
        let (channel, envelope) = next_event(&mut created).await.expect("user created event");
        assert_eq!(channel, "USERCREATEDEVENT");
        assert_eq!(envelope.event_user_reference, "u-1");
        assert!(next_event(&mut created).await.is_none());

        let stats = runtime.shutdown().await;
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].received, 3);
        assert_eq!(stats[0].handled, 3);
        assert_eq!(stats[0].failed, 0);
    }

    #[tokio::test]
    async fn test_verify_email_flips_flag_on_existing_user() {
        let mut runtime = ServiceRuntime::new(ServiceConfig::default());
        let container = runtime.container();
        runtime.start();
        wait_for_subscribers(&container.transport, 1).await;

        container
            .transport
            .publish("OTPVALIDATEDEVENT:CREATE_USER", validated("create_user", "u-2", PHONE))
            .await
            .unwrap();
        container
            .transport
            .publish(
                "OTPVALIDATEDEVENT:VERIFY_EMAIL",
                validated("verify_email", "u-2", "ada@walls.africa"),
            )
            .await
            .unwrap();

        timeout(Duration::from_secs(1), async {
            loop {
                if let Ok(user) = container.repository.get_user_by_reference("u-2").await {
                    if user.user_profile.is_verified_email {
                        break;
                    }
                }
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("email verified");

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_unknown_discriminator_is_counted_as_failure() {
        let mut runtime = ServiceRuntime::new(ServiceConfig::default());
        let container = runtime.container();
        runtime.start();
        wait_for_subscribers(&container.transport, 1).await;

        container
            .transport
            .publish(
                "OTPVALIDATEDEVENT:CREATE_COMPANY",
                validated("create_company", "u-3", PHONE),
            )
            .await
            .unwrap();
        container
            .transport
            .publish("OTPVALIDATEDEVENT:CREATE_USER", validated("create_user", "u-3", PHONE))
            .await
            .unwrap();

        // The bad message does not stop the loop.
        timeout(Duration::from_secs(1), async {
            while container.repository.get_user_by_reference("u-3").await.is_err() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("loop kept running");

        let stats = runtime.shutdown().await;
        assert_eq!(stats[0].failed, 1);
        assert_eq!(stats[0].handled, 1);
    }

    // =============================================================================
    // INBOUND: CHANNEL ALLOW-LIST
    // =============================================================================

    #[tokio::test]
    async fn test_unregistered_pattern_never_reaches_handler() {
        let runtime = ServiceRuntime::new(ServiceConfig::default());
        let container = runtime.container();
        let dispatcher = Dispatcher::new(
            "USERCREATEDEVENT*",
            Arc::new(ChannelRegistry::default()),
            container.otp_validated_handler(),
        );

        let result = dispatcher
            .dispatch(InboundMessage {
                pattern: "USERCREATEDEVENT*".into(),
                channel: "USERCREATEDEVENT".into(),
                payload: validated("create_user", "u-4", PHONE),
            })
            .await;

        assert!(matches!(result, Err(BusError::ChannelRejected(p)) if p == "USERCREATEDEVENT*"));
        assert!(container.repository.is_empty().await);
    }

    #[tokio::test]
    async fn test_undecodable_payload_is_reported_not_applied() {
        let runtime = ServiceRuntime::new(ServiceConfig::default());
        let container = runtime.container();
        let dispatcher = Dispatcher::new(
            OTP_VALIDATED,
            container.registry.clone(),
            container.otp_validated_handler(),
        );

        let result = dispatcher
            .dispatch(InboundMessage {
                pattern: OTP_VALIDATED.into(),
                channel: "OTPVALIDATEDEVENT:CREATE_USER".into(),
                payload: b"not json".to_vec(),
            })
            .await;

        assert!(matches!(result, Err(BusError::Decode { .. })));
        assert!(container.repository.is_empty().await);
    }
}
