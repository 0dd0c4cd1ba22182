pub mod booking;
pub mod photographer;
pub mod review;
pub mod user;

pub use booking::{Booking, BookingStatus, Package};
pub use photographer::{PackageOffer, Photographer, PortfolioItem, Pricing, ProfileStatus};
pub use review::Review;
pub use user::{AccountStatus, Role, User};
