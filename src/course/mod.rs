//! Course outline generation: prompt, normalization and orchestration.

pub mod clock;
pub mod generator;
pub mod normalize;
pub mod prompt;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use generator::CourseGenerator;
pub use normalize::{module_id, normalize};
pub use prompt::build_course_prompt;
pub use types::{ContentItem, ContentKind, CourseStructure, GenerationRequest, Module};
