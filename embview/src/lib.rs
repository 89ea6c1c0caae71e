pub mod config;
pub mod error;
pub mod geometry {
    pub mod limits;
    pub mod polygon;
    pub mod transform;
}
pub mod interaction;
pub mod link;
pub mod model;
pub mod points;
pub mod protocol;
pub mod render;
pub mod session;
pub mod state;

pub use config::{EngineConfig, Palette};
pub use error::{EngineError, LinkError, SurfaceError};
pub use interaction::{Commit, Gesture, InteractionController, Reaction};
pub use link::{LinkBinding, Synchronizer};
pub use model::{PointerButton, Rgb, ScreenPos, Vec2, ViewId, ViewRole, UNSELECTED};
pub use points::{Attribute, LineSet, PointRecord, PointSet};
pub use protocol::{InboundMessage, OutboundMessage, SummaryKind};
pub use render::{FrameStats, HeadlessSurface, Pass, Primitive, RenderPipeline, Surface};
pub use session::{
    AggregationCollaborator, ChartCollaborator, Detached, Session, SessionBuilder, View, ViewData,
};
pub use state::{CommitOutcome, SelectionState};
