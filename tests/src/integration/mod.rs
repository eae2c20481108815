//! Cross-crate integration tests.

pub mod authorization;
pub mod otp_flow;
pub mod transfers;

#[cfg(test)]
pub(crate) mod support {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use shared_bus::{InMemoryTransport, MessageStream};
    use shared_types::{CurrentUser, Device, EventEnvelope};
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    pub const PHONE: &str = "+2348000000000";

    pub fn device(reference: &str) -> Device {
        Device {
            device_reference: reference.into(),
            imei: format!("35693803564{reference}"),
            device_type: "mobile".into(),
            brand: "Samsung".into(),
            model: "S23".into(),
        }
    }

    /// The claim the request boundary would build for `user_reference`.
    pub fn claim(user_reference: &str) -> CurrentUser {
        CurrentUser::new(user_reference, PHONE, device(user_reference))
    }

    /// An OTP-validated envelope as the external verifier emits it.
    pub fn validated(otp_type: &str, user_reference: &str, contact: &str) -> Vec<u8> {
        EventEnvelope::new(
            "otpvalidatedevent",
            otp_type,
            "walls-otp-service",
            user_reference,
            json!({
                "user_reference": user_reference,
                "otp_type": otp_type,
                "contact": contact,
                "device": device(user_reference),
            }),
        )
        .to_bytes()
        .unwrap()
    }

    /// Wait until `count` subscriptions are open on the transport.
    pub async fn wait_for_subscribers(transport: &Arc<InMemoryTransport>, count: usize) {
        timeout(Duration::from_secs(1), async {
            while transport.subscriber_count() < count {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("subscribers did not attach");
    }

    /// Next envelope on `stream`, or `None` if nothing arrives shortly.
    pub async fn next_event(stream: &mut MessageStream) -> Option<(String, EventEnvelope)> {
        let message = timeout(Duration::from_millis(100), stream.next())
            .await
            .ok()
            .flatten()?;
        let envelope = EventEnvelope::from_slice(&message.payload).unwrap();
        Some((message.channel, envelope))
    }
}
