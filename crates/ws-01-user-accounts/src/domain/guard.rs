//! # Authorization Guard
//!
//! The caller's claim must bind to the stored aggregate before any mutation:
//!
//! - **Device binding**: all five device fields equal the bound device.
//! - **Phone binding**: the claimed phone equals the profile phone exactly.
//!
//! No normalization is applied to either side.

use shared_types::{CurrentUser, Device, User};

use super::errors::AuthorizationFailure;

/// All five fields must match. No partial match, no multi-device support.
#[must_use]
pub fn is_registered_device(claimed: &Device, bound: &Device) -> bool {
    claimed.device_reference == bound.device_reference
        && claimed.imei == bound.imei
        && claimed.device_type == bound.device_type
        && claimed.brand == bound.brand
        && claimed.model == bound.model
}

#[must_use]
pub fn is_registered_phone(claimed: &str, bound: &str) -> bool {
    claimed == bound
}

/// Check the claim against the stored user. Device is checked first.
pub fn authorize(claim: &CurrentUser, stored: &User) -> Result<(), AuthorizationFailure> {
    if !is_registered_device(&claim.device, &stored.device) {
        return Err(AuthorizationFailure::UnregisteredDevice);
    }
    if !is_registered_phone(&claim.phone, &stored.user_profile.phone) {
        return Err(AuthorizationFailure::UnregisteredPhone);
    }
    Ok(())
}

/// The caller must be the aggregate it is acting on.
pub fn ensure_owner(claim: &CurrentUser, stored: &User) -> Result<(), AuthorizationFailure> {
    if claim.user_reference != stored.user_reference {
        return Err(AuthorizationFailure::NotOwner {
            caller: claim.user_reference.clone(),
            target: stored.user_reference.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> Device {
        Device {
            device_reference: "d-1".into(),
            imei: "356938035643809".into(),
            device_type: "mobile".into(),
            brand: "Samsung".into(),
            model: "S23".into(),
        }
    }

    fn stored() -> User {
        let mut user = User {
            user_reference: "u-1".into(),
            device: device(),
            ..Default::default()
        };
        user.user_profile.phone = "+2348000000000".into();
        user
    }

    fn claim() -> CurrentUser {
        CurrentUser::new("u-1", "+2348000000000", device())
    }

    #[test]
    fn test_matching_claim_passes() {
        assert!(authorize(&claim(), &stored()).is_ok());
        assert!(ensure_owner(&claim(), &stored()).is_ok());
    }

    #[test]
    fn test_each_device_field_is_checked() {
        let mutations: [fn(&mut Device); 5] = [
            |d| d.device_reference.push('x'),
            |d| d.imei.push('0'),
            |d| d.device_type = "tablet".into(),
            |d| d.brand = "Apple".into(),
            |d| d.model = "S24".into(),
        ];

        for mutate in mutations {
            let mut c = claim();
            mutate(&mut c.device);
            assert_eq!(
                authorize(&c, &stored()),
                Err(AuthorizationFailure::UnregisteredDevice)
            );
        }
    }

    #[test]
    fn test_phone_is_compared_without_normalization() {
        let mut c = claim();
        c.phone = "2348000000000".into();
        assert_eq!(
            authorize(&c, &stored()),
            Err(AuthorizationFailure::UnregisteredPhone)
        );
    }

    #[test]
    fn test_owner_mismatch() {
        let mut c = claim();
        c.user_reference = "u-2".into();
        assert!(matches!(
            ensure_owner(&c, &stored()),
            Err(AuthorizationFailure::NotOwner { .. })
        ));
    }
}
