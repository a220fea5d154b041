mod ids;
mod landmark;
mod mode;
mod question;
mod session;
mod station;

pub use ids::{ParseIdError, PoolIndex, SessionKey};
pub use landmark::{Landmark, LandmarkCatalog, LandmarkError};
pub use mode::{ModeParseError, TravelMode};
pub use question::{OPTION_COUNT, Question, QuestionDraft, QuestionError, QuestionPool};
pub use session::{Judgement, Phase, SessionRecord, SessionState};
pub use station::{RouteError, RouteTable, Station};
