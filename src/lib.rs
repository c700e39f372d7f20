#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod config;
pub mod error;
mod handlers;
pub mod history;
pub mod input;
mod panels;
pub mod pen;
pub mod snapshot;
pub mod state;
pub mod stroke;
pub mod surface;

pub use app::FreehandApp;
pub use config::{KeyChord, SessionConfig, Shortcuts};
pub use error::{StrokeError, SurfaceError};
pub use history::{HistoryConfig, HistoryManager};
pub use input::{CanvasFocus, InputEvent, InputHandler};
pub use pen::{LineCap, LineJoin, PenState};
pub use snapshot::Snapshot;
pub use state::{DrawingSessionState, Outcome};
pub use stroke::{FinishedStroke, StrokeRenderer};
pub use surface::{RasterSurface, Surface};
