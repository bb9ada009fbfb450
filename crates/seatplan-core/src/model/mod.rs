pub mod guest;
pub mod seating;
pub mod table;

pub use guest::{Guest, GuestFilter, GuestId, GuestUpdate, NewGuest};
pub use seating::{seats_required, OccupiedTable, Seating};
pub use table::{NewTable, Table, TableId, TableUpdate};
