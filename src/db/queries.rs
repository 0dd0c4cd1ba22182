use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{
    AccountStatus, Booking, BookingStatus, Package, Photographer, Pricing, ProfileStatus, Review,
    Role, User,
};

fn now_str() -> String {
    Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn parse_ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc())
}

// ── Users ──

pub fn create_user(conn: &Connection, user: &User) -> anyhow::Result<()> {
    let permissions = serde_json::to_string(&user.permissions)?;
    let last_login = user
        .last_login
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string());

    conn.execute(
        "INSERT INTO users (id, name, email, password_hash, phone, role, is_active, status, permissions, last_login, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            user.id,
            user.name,
            user.email,
            user.password_hash,
            user.phone,
            user.role.as_str(),
            user.is_active as i32,
            user.status.as_str(),
            permissions,
            last_login,
            user.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            user.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ],
    )?;
    Ok(())
}

const USER_COLUMNS: &str =
    "id, name, email, password_hash, phone, role, is_active, status, permissions, last_login, created_at, updated_at";

fn parse_user_row(row: &rusqlite::Row) -> anyhow::Result<User> {
    let role_str: String = row.get(5)?;
    let status_str: String = row.get(7)?;
    let permissions_json: Option<String> = row.get(8)?;
    let last_login_str: Option<String> = row.get(9)?;
    let created_at_str: String = row.get(10)?;
    let updated_at_str: String = row.get(11)?;

    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        phone: row.get(4)?,
        role: Role::parse(&role_str).unwrap_or(Role::User),
        is_active: row.get::<_, i32>(6)? != 0,
        status: AccountStatus::parse(&status_str).unwrap_or(AccountStatus::Approved),
        permissions: permissions_json
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default(),
        last_login: last_login_str.as_deref().map(parse_ts),
        created_at: parse_ts(&created_at_str),
        updated_at: parse_ts(&updated_at_str),
    })
}

pub fn get_user_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
        params![id],
        |row| Ok(parse_user_row(row)),
    );

    match result {
        Ok(user) => Ok(Some(user?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
        params![email],
        |row| Ok(parse_user_row(row)),
    );

    match result {
        Ok(user) => Ok(Some(user?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_users(conn: &Connection) -> anyhow::Result<Vec<User>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
    ))?;
    let rows = stmt.query_map([], |row| Ok(parse_user_row(row)))?;

    let mut users = vec![];
    for row in rows {
        users.push(row??);
    }
    Ok(users)
}

pub fn touch_last_login(conn: &Connection, id: &str) -> anyhow::Result<()> {
    let now = now_str();
    conn.execute(
        "UPDATE users SET last_login = ?1, updated_at = ?1 WHERE id = ?2",
        params![now, id],
    )?;
    Ok(())
}

pub fn update_user_contact(conn: &Connection, user: &User) -> anyhow::Result<()> {
    conn.execute(
        "UPDATE users SET name = ?1, phone = ?2, updated_at = ?3 WHERE id = ?4",
        params![user.name, user.phone, now_str(), user.id],
    )?;
    Ok(())
}

pub fn set_user_status(
    conn: &Connection,
    id: &str,
    status: AccountStatus,
    is_active: bool,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE users SET status = ?1, is_active = ?2, updated_at = ?3 WHERE id = ?4",
        params![status.as_str(), is_active as i32, now_str(), id],
    )?;
    Ok(count > 0)
}

pub fn delete_user(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Photographers ──

pub fn create_photographer(conn: &Connection, p: &Photographer) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO photographers (id, name, email, password_hash, phone, is_active, display_name, location, bio, genres, pricing, portfolio, profile_pic, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            p.id,
            p.name,
            p.email,
            p.password_hash,
            p.phone,
            p.is_active as i32,
            p.display_name,
            p.location,
            p.bio,
            serde_json::to_string(&p.genres)?,
            serde_json::to_string(&p.pricing)?,
            serde_json::to_string(&p.portfolio)?,
            p.profile_pic,
            p.status.as_str(),
            p.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            p.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ],
    )?;
    Ok(())
}

const PHOTOGRAPHER_COLUMNS: &str =
    "id, name, email, password_hash, phone, is_active, display_name, location, bio, genres, pricing, portfolio, profile_pic, status, created_at, updated_at";

fn parse_photographer_row(row: &rusqlite::Row) -> anyhow::Result<Photographer> {
    let genres_json: String = row.get(9)?;
    let pricing_json: String = row.get(10)?;
    let portfolio_json: String = row.get(11)?;
    let status_str: String = row.get(13)?;
    let created_at_str: String = row.get(14)?;
    let updated_at_str: String = row.get(15)?;

    Ok(Photographer {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        phone: row.get(4)?,
        is_active: row.get::<_, i32>(5)? != 0,
        display_name: row.get(6)?,
        location: row.get(7)?,
        bio: row.get(8)?,
        genres: serde_json::from_str(&genres_json).unwrap_or_default(),
        pricing: serde_json::from_str::<Pricing>(&pricing_json)
            .unwrap_or_else(|_| Pricing::new(0.0)),
        portfolio: serde_json::from_str(&portfolio_json).unwrap_or_default(),
        profile_pic: row.get(12)?,
        status: ProfileStatus::parse(&status_str).unwrap_or(ProfileStatus::Pending),
        created_at: parse_ts(&created_at_str),
        updated_at: parse_ts(&updated_at_str),
    })
}

pub fn get_photographer_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Photographer>> {
    let result = conn.query_row(
        &format!("SELECT {PHOTOGRAPHER_COLUMNS} FROM photographers WHERE id = ?1"),
        params![id],
        |row| Ok(parse_photographer_row(row)),
    );

    match result {
        Ok(p) => Ok(Some(p?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_photographer_by_email(
    conn: &Connection,
    email: &str,
) -> anyhow::Result<Option<Photographer>> {
    let result = conn.query_row(
        &format!("SELECT {PHOTOGRAPHER_COLUMNS} FROM photographers WHERE email = ?1"),
        params![email],
        |row| Ok(parse_photographer_row(row)),
    );

    match result {
        Ok(p) => Ok(Some(p?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Publicly browsable photographers: approved and active.
pub fn list_approved_photographers(conn: &Connection) -> anyhow::Result<Vec<Photographer>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PHOTOGRAPHER_COLUMNS} FROM photographers
         WHERE status = 'approved' AND is_active = 1
         ORDER BY created_at DESC"
    ))?;
    let rows = stmt.query_map([], |row| Ok(parse_photographer_row(row)))?;

    let mut photographers = vec![];
    for row in rows {
        photographers.push(row??);
    }
    Ok(photographers)
}

/// Admin listing: every photographer plus their read-side average rating.
pub fn list_photographers_with_rating(
    conn: &Connection,
) -> anyhow::Result<Vec<(Photographer, f64)>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PHOTOGRAPHER_COLUMNS},
                COALESCE((SELECT ROUND(AVG(r.rating), 1) FROM reviews r WHERE r.photographer_id = photographers.id), 0)
         FROM photographers ORDER BY created_at DESC"
    ))?;
    let rows = stmt.query_map([], |row| {
        let rating: f64 = row.get(16)?;
        Ok((parse_photographer_row(row), rating))
    })?;

    let mut photographers = vec![];
    for row in rows {
        let (p, rating) = row?;
        photographers.push((p?, rating));
    }
    Ok(photographers)
}

/// Persists the mutable profile fields after a load-modify cycle.
pub fn save_photographer_profile(conn: &Connection, p: &Photographer) -> anyhow::Result<()> {
    conn.execute(
        "UPDATE photographers SET
           name = ?1, phone = ?2, display_name = ?3, location = ?4, bio = ?5,
           genres = ?6, pricing = ?7, portfolio = ?8, profile_pic = ?9, updated_at = ?10
         WHERE id = ?11",
        params![
            p.name,
            p.phone,
            p.display_name,
            p.location,
            p.bio,
            serde_json::to_string(&p.genres)?,
            serde_json::to_string(&p.pricing)?,
            serde_json::to_string(&p.portfolio)?,
            p.profile_pic,
            now_str(),
            p.id,
        ],
    )?;
    Ok(())
}

pub fn set_photographer_status(
    conn: &Connection,
    id: &str,
    status: ProfileStatus,
    is_active: bool,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE photographers SET status = ?1, is_active = ?2, updated_at = ?3 WHERE id = ?4",
        params![status.as_str(), is_active as i32, now_str(), id],
    )?;
    Ok(count > 0)
}

pub fn delete_photographer(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM photographers WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Bookings ──

// Returns the raw rusqlite error so callers can tell a unique-index
// violation on the active-slot tuple apart from other failures.
pub fn insert_booking(conn: &Connection, booking: &Booking) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, user_id, photographer_id, date, time_slot, package, title, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            booking.id,
            booking.user_id,
            booking.photographer_id,
            booking.date.format("%Y-%m-%d").to_string(),
            booking.time_slot,
            booking.package.as_str(),
            booking.title,
            booking.status.as_str(),
            booking.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            booking.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ],
    )?;
    Ok(())
}

const BOOKING_COLUMNS: &str =
    "id, user_id, photographer_id, date, time_slot, package, title, status, created_at, updated_at";

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let date_str: String = row.get(3)?;
    let package_str: String = row.get(5)?;
    let status_str: String = row.get(7)?;
    let created_at_str: String = row.get(8)?;
    let updated_at_str: String = row.get(9)?;

    Ok(Booking {
        id: row.get(0)?,
        user_id: row.get(1)?,
        photographer_id: row.get(2)?,
        date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .unwrap_or_else(|_| Utc::now().date_naive()),
        time_slot: row.get(4)?,
        package: Package::parse(&package_str).unwrap_or(Package::Basic),
        title: row.get(6)?,
        status: BookingStatus::parse(&status_str).unwrap_or(BookingStatus::Pending),
        created_at: parse_ts(&created_at_str),
        updated_at: parse_ts(&updated_at_str),
    })
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// True when a pending or approved booking already holds the slot tuple.
pub fn has_active_slot_booking(
    conn: &Connection,
    photographer_id: &str,
    user_id: &str,
    date: &NaiveDate,
    time_slot: &str,
    package: Package,
) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings
         WHERE photographer_id = ?1 AND user_id = ?2 AND date = ?3 AND time_slot = ?4
           AND package = ?5 AND status IN ('pending', 'approved')",
        params![
            photographer_id,
            user_id,
            date.format("%Y-%m-%d").to_string(),
            time_slot,
            package.as_str(),
        ],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Terminal-state check and write in one statement: rows stay untouched
/// once rejected or completed. Returns the number of rows changed.
pub fn update_booking_status_if_open(
    conn: &Connection,
    id: &str,
    status: BookingStatus,
) -> anyhow::Result<usize> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2
         WHERE id = ?3 AND status NOT IN ('rejected', 'completed')",
        params![status.as_str(), now_str(), id],
    )?;
    Ok(count)
}

pub fn bookings_for_user(conn: &Connection, user_id: &str) -> anyhow::Result<Vec<(Booking, String)>> {
    bookings_with_photographer(conn, "b.user_id = ?1", user_id)
}

pub fn bookings_for_photographer(
    conn: &Connection,
    photographer_id: &str,
) -> anyhow::Result<Vec<(Booking, String)>> {
    bookings_with_photographer(conn, "b.photographer_id = ?1", photographer_id)
}

fn bookings_with_photographer(
    conn: &Connection,
    filter: &str,
    id: &str,
) -> anyhow::Result<Vec<(Booking, String)>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT b.id, b.user_id, b.photographer_id, b.date, b.time_slot, b.package, b.title, b.status, b.created_at, b.updated_at, p.name
         FROM bookings b
         INNER JOIN photographers p ON b.photographer_id = p.id
         WHERE {filter}
         ORDER BY b.created_at DESC"
    ))?;
    let rows = stmt.query_map(params![id], |row| {
        let photographer_name: String = row.get(10)?;
        Ok((parse_booking_row(row), photographer_name))
    })?;

    let mut bookings = vec![];
    for row in rows {
        let (booking, name) = row?;
        bookings.push((booking?, name));
    }
    Ok(bookings)
}

pub fn count_bookings_for_user(
    conn: &Connection,
    user_id: &str,
    status: Option<BookingStatus>,
) -> anyhow::Result<i64> {
    count_bookings(conn, "user_id", user_id, status)
}

pub fn count_bookings_for_photographer(
    conn: &Connection,
    photographer_id: &str,
    status: Option<BookingStatus>,
) -> anyhow::Result<i64> {
    count_bookings(conn, "photographer_id", photographer_id, status)
}

fn count_bookings(
    conn: &Connection,
    column: &str,
    id: &str,
    status: Option<BookingStatus>,
) -> anyhow::Result<i64> {
    let count: i64 = match status {
        Some(status) => conn.query_row(
            &format!("SELECT COUNT(*) FROM bookings WHERE {column} = ?1 AND status = ?2"),
            params![id, status.as_str()],
            |row| row.get(0),
        )?,
        None => conn.query_row(
            &format!("SELECT COUNT(*) FROM bookings WHERE {column} = ?1"),
            params![id],
            |row| row.get(0),
        )?,
    };
    Ok(count)
}

// ── Reviews ──

pub fn insert_review(conn: &Connection, review: &Review) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO reviews (id, user_id, photographer_id, name, rating, comment, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            review.id,
            review.user_id,
            review.photographer_id,
            review.name,
            review.rating,
            review.comment,
            review.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ],
    )?;
    Ok(())
}

pub fn reviews_for_photographer(
    conn: &Connection,
    photographer_id: &str,
) -> anyhow::Result<Vec<Review>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, photographer_id, name, rating, comment, created_at
         FROM reviews WHERE photographer_id = ?1 ORDER BY created_at DESC",
    )?;
    let rows = stmt.query_map(params![photographer_id], |row| {
        let created_at_str: String = row.get(6)?;
        Ok(Review {
            id: row.get(0)?,
            user_id: row.get(1)?,
            photographer_id: row.get(2)?,
            name: row.get(3)?,
            rating: row.get(4)?,
            comment: row.get(5)?,
            created_at: parse_ts(&created_at_str),
        })
    })?;

    let mut reviews = vec![];
    for row in rows {
        reviews.push(row?);
    }
    Ok(reviews)
}

/// Average rating (one decimal) and review count, computed on read.
pub fn rating_summary(conn: &Connection, photographer_id: &str) -> anyhow::Result<(f64, i64)> {
    let summary = conn.query_row(
        "SELECT COALESCE(ROUND(AVG(rating), 1), 0), COUNT(*)
         FROM reviews WHERE photographer_id = ?1",
        params![photographer_id],
        |row| Ok((row.get::<_, f64>(0)?, row.get::<_, i64>(1)?)),
    )?;
    Ok(summary)
}

// ── Moderation stats ──

pub struct AdminStats {
    pub total_users: i64,
    pub blocked_users: i64,
    pub active_photographers: i64,
    pub pending_approvals: i64,
    pub pending_bookings: i64,
    pub completed_bookings: i64,
}

pub fn admin_stats(conn: &Connection) -> anyhow::Result<AdminStats> {
    let total_users: i64 =
        conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    let blocked_users: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE is_active = 0",
        [],
        |row| row.get(0),
    )?;
    let active_photographers: i64 = conn.query_row(
        "SELECT COUNT(*) FROM photographers WHERE status = 'approved' AND is_active = 1",
        [],
        |row| row.get(0),
    )?;
    let pending_approvals: i64 = conn.query_row(
        "SELECT COUNT(*) FROM photographers WHERE status = 'pending'",
        [],
        |row| row.get(0),
    )?;
    let pending_bookings: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE status = 'pending'",
        [],
        |row| row.get(0),
    )?;
    let completed_bookings: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE status = 'completed'",
        [],
        |row| row.get(0),
    )?;

    Ok(AdminStats {
        total_users,
        blocked_users,
        active_photographers,
        pending_approvals,
        pending_bookings,
        completed_bookings,
    })
}
