//! Application state and core logic

pub mod input;
pub mod screen;
pub mod session;
pub mod state;
pub mod welcome;

pub use input::KeyInput;
pub use screen::{AppCoordinator, Screen, Snapshot};
pub use session::{generate_room_code, Mode, Session, ROOM_CODE_LEN};
pub use state::{DebateRoom, MAX_DRAFT_LEN};
pub use welcome::{Field, WelcomeForm, MAX_NAME_LEN};
