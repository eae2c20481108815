//! # Caller Binding
//!
//! An account created from a validated OTP is bound to the phone and device
//! in that event. Every later mutation, from either service, must come from
//! the same phone on the same device; a rejected call leaves the aggregate
//! untouched and publishes nothing.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shared_bus::{MessageHandler, Transport};
    use shared_types::EventEnvelope;

    use service_runtime::{ServiceConfig, ServiceContainer};
    use ws_01_user_accounts::{
        AccountError, AuthorizationFailure, UserAccountsApi, UserName, UserRepository,
    };
    use ws_02_otp_handshake::{HandshakeError, OtpRequest};

    use crate::integration::support::{claim, device, next_event, validated, PHONE};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// A container holding one user created the way production creates them.
    async fn onboarded(user_reference: &str) -> Arc<ServiceContainer> {
        let container = Arc::new(ServiceContainer::new(ServiceConfig::default()));
        let envelope =
            EventEnvelope::from_slice(&validated("create_user", user_reference, PHONE)).unwrap();
        container
            .otp_validated_handler()
            .handle(envelope)
            .await
            .unwrap();
        container
    }

    fn ada() -> UserName {
        UserName {
            first_name: "Ada".into(),
            last_name: "Obi".into(),
        }
    }

    // =============================================================================
    // ACCOUNT MUTATIONS
    // =============================================================================

    #[tokio::test]
    async fn test_bound_caller_can_mutate() {
        let container = onboarded("u-1").await;
        let mut updates = container.transport.subscribe("USERNAMEUPDATEDEVENT").unwrap();

        container
            .accounts
            .update_user_name("u-1", ada(), &claim("u-1"))
            .await
            .unwrap();

        let user = container.repository.get_user_by_reference("u-1").await.unwrap();
        assert_eq!(user.user_profile.full_name, "Ada, Obi");
        let (_, envelope) = next_event(&mut updates).await.expect("username event");
        assert_eq!(envelope.event_data["user_reference"], "u-1");
        assert_eq!(envelope.event_data["contact"], PHONE);
    }

    #[tokio::test]
    async fn test_other_device_is_rejected_without_side_effects() {
        let container = onboarded("u-1").await;
        let before = container.repository.get_user_by_reference("u-1").await.unwrap();
        let mut events = container.transport.subscribe("*").unwrap();

        let mut stolen = claim("u-1");
        stolen.device = device("u-9");

        let err = container
            .accounts
            .update_user_name("u-1", ada(), &stolen)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AccountError::Authorization(AuthorizationFailure::UnregisteredDevice)
        ));
        assert_eq!(
            container.repository.get_user_by_reference("u-1").await.unwrap(),
            before
        );
        assert!(next_event(&mut events).await.is_none());
    }

    #[tokio::test]
    async fn test_other_phone_is_rejected() {
        let container = onboarded("u-1").await;
        let mut swapped = claim("u-1");
        swapped.phone = "+2348111111111".into();

        let err = container
            .accounts
            .update_email("u-1", "ada@walls.africa".into(), &swapped)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AccountError::Authorization(AuthorizationFailure::UnregisteredPhone)
        ));
    }

    // =============================================================================
    // OTP REQUESTS
    // =============================================================================

    #[tokio::test]
    async fn test_verify_phone_otp_needs_a_bound_caller() {
        let container = onboarded("u-1").await;
        let mut requests = container.transport.subscribe("OTPREQUESTCREATEDEVENT*").unwrap();

        let request = OtpRequest {
            otp_type: "verify_phone".into(),
            contact: PHONE.into(),
            channel: "sms".into(),
            device: device("u-1"),
        };

        let mut stolen = claim("u-1");
        stolen.device = device("u-9");
        let err = container
            .otp
            .request_otp(request.clone(), &stolen)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            HandshakeError::Account(AccountError::Authorization(_))
        ));
        assert!(next_event(&mut requests).await.is_none());

        container.otp.request_otp(request, &claim("u-1")).await.unwrap();
        let (channel, _) = next_event(&mut requests).await.expect("otp request");
        assert_eq!(channel, "OTPREQUESTCREATEDEVENT:VERIFY_PHONE");
    }

    #[tokio::test]
    async fn test_create_company_otp_for_unknown_caller_is_not_found() {
        let container = Arc::new(ServiceContainer::new(ServiceConfig::default()));

        let err = container
            .otp
            .request_otp(
                OtpRequest {
                    otp_type: "create_company".into(),
                    contact: "Walls Ltd".into(),
                    channel: "email".into(),
                    device: device("u-5"),
                },
                &claim("u-5"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, HandshakeError::Account(e) if e.is_not_found()));
        assert_eq!(container.transport.messages_published(), 0);
    }
}
