use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, Package, ProfileStatus};

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub photographer_id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub package: Package,
    pub title: String,
}

/// Creates a booking in `pending` state, refusing the request while another
/// pending or approved booking holds the same
/// (photographer, user, date, slot, package) tuple.
///
/// The pre-check gives a friendly error on the common path; the partial
/// unique index on the tuple is what actually closes the race between two
/// concurrent identical requests, and a constraint violation on insert is
/// reported as the same conflict.
pub fn create_booking(conn: &Connection, req: NewBooking) -> Result<Booking, AppError> {
    let photographer = queries::get_photographer_by_id(conn, &req.photographer_id)?;
    let bookable = photographer
        .map(|p| p.status == ProfileStatus::Approved && p.is_active)
        .unwrap_or(false);
    if !bookable {
        return Err(AppError::NotFound(
            "Photographer not found or not approved".to_string(),
        ));
    }

    if queries::has_active_slot_booking(
        conn,
        &req.photographer_id,
        &req.user_id,
        &req.date,
        &req.time_slot,
        req.package,
    )? {
        return Err(AppError::Conflict(
            "Selected slot is already booked".to_string(),
        ));
    }

    let now = Utc::now().naive_utc();
    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        user_id: req.user_id,
        photographer_id: req.photographer_id,
        date: req.date,
        time_slot: req.time_slot,
        package: req.package,
        title: req.title,
        status: BookingStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    match queries::insert_booking(conn, &booking) {
        Ok(()) => Ok(booking),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(AppError::Conflict(
                "Selected slot is already booked".to_string(),
            ))
        }
        Err(e) => Err(e.into()),
    }
}

/// Applies a status transition. Rejected and completed bookings are
/// immutable; any other booking accepts any of the four target statuses.
///
/// The terminal-state guard is part of the UPDATE itself, so two racing
/// updates cannot both get past it: whichever lands second sees zero rows
/// changed and reports the conflict.
pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    target: BookingStatus,
) -> Result<Booking, AppError> {
    let changed = queries::update_booking_status_if_open(conn, id, target)?;

    if changed == 0 {
        return match queries::get_booking_by_id(conn, id)? {
            None => Err(AppError::NotFound("Booking not found".to_string())),
            Some(booking) => Err(AppError::Conflict(format!(
                "Booking is {}, cannot update again",
                booking.status.as_str()
            ))),
        };
    }

    queries::get_booking_by_id(conn, id)?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{Photographer, Pricing, User};
    use crate::services::auth;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn seed_user(conn: &Connection, id: &str) {
        let now = Utc::now().naive_utc();
        let user = User {
            id: id.to_string(),
            name: "Asha".to_string(),
            email: format!("{id}@example.com"),
            password_hash: auth::hash_password("secret123").unwrap(),
            phone: "9876543210".to_string(),
            role: crate::models::Role::User,
            is_active: true,
            status: crate::models::AccountStatus::Approved,
            permissions: vec![],
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        queries::create_user(conn, &user).unwrap();
    }

    fn seed_photographer(conn: &Connection, id: &str, status: ProfileStatus, active: bool) {
        let now = Utc::now().naive_utc();
        let photographer = Photographer {
            id: id.to_string(),
            name: "Ravi".to_string(),
            email: format!("{id}@example.com"),
            password_hash: auth::hash_password("secret123").unwrap(),
            phone: "9123456780".to_string(),
            is_active: active,
            display_name: "Ravi Studio".to_string(),
            location: "Hyderabad".to_string(),
            bio: "Weddings and portraits".to_string(),
            genres: vec!["wedding".to_string()],
            pricing: Pricing::new(5000.0),
            portfolio: vec![],
            profile_pic: String::new(),
            status,
            created_at: now,
            updated_at: now,
        };
        queries::create_photographer(conn, &photographer).unwrap();
    }

    fn request(photographer_id: &str, user_id: &str) -> NewBooking {
        NewBooking {
            photographer_id: photographer_id.to_string(),
            user_id: user_id.to_string(),
            date: date("2025-09-05"),
            time_slot: "10-12".to_string(),
            package: Package::Basic,
            title: "Birthday Party Shoot".to_string(),
        }
    }

    #[test]
    fn test_create_booking_starts_pending() {
        let conn = setup_db();
        seed_user(&conn, "u1");
        seed_photographer(&conn, "p1", ProfileStatus::Approved, true);

        let booking = create_booking(&conn, request("p1", "u1")).unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.package, Package::Basic);

        let stored = queries::get_booking_by_id(&conn, &booking.id).unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Pending);
    }

    #[test]
    fn test_duplicate_active_slot_is_refused() {
        let conn = setup_db();
        seed_user(&conn, "u1");
        seed_photographer(&conn, "p1", ProfileStatus::Approved, true);

        create_booking(&conn, request("p1", "u1")).unwrap();
        let err = create_booking(&conn, request("p1", "u1")).unwrap_err();
        match err {
            AppError::Conflict(msg) => assert_eq!(msg, "Selected slot is already booked"),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_different_tuple_does_not_conflict() {
        let conn = setup_db();
        seed_user(&conn, "u1");
        seed_photographer(&conn, "p1", ProfileStatus::Approved, true);

        create_booking(&conn, request("p1", "u1")).unwrap();

        let mut other_slot = request("p1", "u1");
        other_slot.time_slot = "14-16".to_string();
        assert!(create_booking(&conn, other_slot).is_ok());

        let mut other_package = request("p1", "u1");
        other_package.package = Package::Premium;
        assert!(create_booking(&conn, other_package).is_ok());
    }

    #[test]
    fn test_unapproved_photographer_is_not_found() {
        let conn = setup_db();
        seed_user(&conn, "u1");
        seed_photographer(&conn, "p1", ProfileStatus::Pending, true);
        seed_photographer(&conn, "p2", ProfileStatus::Blocked, false);

        assert!(matches!(
            create_booking(&conn, request("p1", "u1")),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            create_booking(&conn, request("p2", "u1")),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            create_booking(&conn, request("missing", "u1")),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_rebooking_after_rejection_succeeds() {
        let conn = setup_db();
        seed_user(&conn, "u1");
        seed_photographer(&conn, "p1", ProfileStatus::Approved, true);

        // Full scenario: book, duplicate refused, reject, book again.
        let first = create_booking(&conn, request("p1", "u1")).unwrap();
        assert!(create_booking(&conn, request("p1", "u1")).is_err());

        update_booking_status(&conn, &first.id, BookingStatus::Rejected).unwrap();

        let second = create_booking(&conn, request("p1", "u1")).unwrap();
        assert_eq!(second.status, BookingStatus::Pending);
        assert_ne!(second.id, first.id);
    }

    #[test]
    fn test_rebooking_after_completion_succeeds() {
        let conn = setup_db();
        seed_user(&conn, "u1");
        seed_photographer(&conn, "p1", ProfileStatus::Approved, true);

        let first = create_booking(&conn, request("p1", "u1")).unwrap();
        update_booking_status(&conn, &first.id, BookingStatus::Completed).unwrap();

        assert!(create_booking(&conn, request("p1", "u1")).is_ok());
    }

    #[test]
    fn test_lifecycle_pending_approved_completed() {
        let conn = setup_db();
        seed_user(&conn, "u1");
        seed_photographer(&conn, "p1", ProfileStatus::Approved, true);

        let booking = create_booking(&conn, request("p1", "u1")).unwrap();

        let approved = update_booking_status(&conn, &booking.id, BookingStatus::Approved).unwrap();
        assert_eq!(approved.status, BookingStatus::Approved);

        let completed =
            update_booking_status(&conn, &booking.id, BookingStatus::Completed).unwrap();
        assert_eq!(completed.status, BookingStatus::Completed);
    }

    #[test]
    fn test_pending_straight_to_completed_is_allowed() {
        let conn = setup_db();
        seed_user(&conn, "u1");
        seed_photographer(&conn, "p1", ProfileStatus::Approved, true);

        let booking = create_booking(&conn, request("p1", "u1")).unwrap();
        let completed =
            update_booking_status(&conn, &booking.id, BookingStatus::Completed).unwrap();
        assert_eq!(completed.status, BookingStatus::Completed);
    }

    #[test]
    fn test_completed_booking_is_immutable() {
        let conn = setup_db();
        seed_user(&conn, "u1");
        seed_photographer(&conn, "p1", ProfileStatus::Approved, true);

        let booking = create_booking(&conn, request("p1", "u1")).unwrap();
        update_booking_status(&conn, &booking.id, BookingStatus::Completed).unwrap();

        let err = update_booking_status(&conn, &booking.id, BookingStatus::Approved).unwrap_err();
        match err {
            AppError::Conflict(msg) => {
                assert_eq!(msg, "Booking is completed, cannot update again")
            }
            other => panic!("expected conflict, got {other:?}"),
        }

        let stored = queries::get_booking_by_id(&conn, &booking.id).unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Completed);
    }

    #[test]
    fn test_rejected_booking_is_immutable() {
        let conn = setup_db();
        seed_user(&conn, "u1");
        seed_photographer(&conn, "p1", ProfileStatus::Approved, true);

        let booking = create_booking(&conn, request("p1", "u1")).unwrap();
        update_booking_status(&conn, &booking.id, BookingStatus::Rejected).unwrap();

        let err = update_booking_status(&conn, &booking.id, BookingStatus::Pending).unwrap_err();
        match err {
            AppError::Conflict(msg) => {
                assert_eq!(msg, "Booking is rejected, cannot update again")
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_update_missing_booking_is_not_found() {
        let conn = setup_db();
        assert!(matches!(
            update_booking_status(&conn, "nope", BookingStatus::Approved),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_unique_index_backstops_the_precheck() {
        let conn = setup_db();
        seed_user(&conn, "u1");
        seed_photographer(&conn, "p1", ProfileStatus::Approved, true);

        let booking = create_booking(&conn, request("p1", "u1")).unwrap();

        // Insert the same tuple directly, simulating a racing request that
        // passed the pre-check before the first insert landed.
        let mut twin = booking.clone();
        twin.id = Uuid::new_v4().to_string();
        let err = queries::insert_booking(&conn, &twin).unwrap_err();
        assert!(matches!(
            err,
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        ));
    }
}
