pub mod access;
pub mod domain;
pub mod lexical;
pub mod ports;
pub mod registry;
pub mod retrieval;

pub use access::{resolve_scope, Principal, VisibilityScope};
pub use domain::{ChunkPatch, DocumentChunk, Identity, Metadata, NewChunk, ProfilePatch, Role, UserProfile};
pub use lexical::{LexicalIndex, ScopedKey, ScoredChunk};
pub use ports::{Credentials, IdentityProvider, PortError, PortResult, ProfileStore};
pub use registry::{CourseIndex, GlobalIndex, IndexRegistry};
pub use retrieval::{HitView, RetrievalService, SearchHit};
