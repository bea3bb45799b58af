//! services/api/src/web/protocol.rs
//!
//! Defines the JSON request and response bodies exchanged with HTTP clients,
//! and their conversions to and from the core domain types.

use chrono::{DateTime, Utc};
use course_search_core::domain::{
    ChunkPatch, DocumentChunk, Metadata, NewChunk, ProfilePatch, Role, UserProfile,
};
use course_search_core::retrieval::SearchHit;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;

pub const DEFAULT_PAGE_SIZE: usize = 10;

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

//=========================================================================================
// Documents
//=========================================================================================

/// A chunk as submitted for indexing. `course_id` and timestamps, if sent, are ignored.
#[derive(Deserialize, ToSchema, Debug)]
pub struct DocumentChunkPayload {
    pub id: Option<String>,
    pub course_id: Option<String>,
    pub source: Option<String>,
    pub chunk_index: Option<i64>,
    pub title: Option<String>,
    pub headings: Option<Vec<String>>,
    pub content: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: Metadata,
}

impl DocumentChunkPayload {
    pub fn into_new_chunk(self) -> Result<NewChunk, ApiError> {
        require_content(&self.content)?;
        Ok(NewChunk {
            id: self.id,
            source: self.source,
            chunk_index: self.chunk_index,
            title: self.title,
            headings: self.headings,
            content: self.content,
            metadata: self.metadata,
        })
    }
}

/// A stored chunk.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct DocumentChunkBody {
    pub id: String,
    pub course_id: String,
    pub source: Option<String>,
    pub chunk_index: Option<i64>,
    pub title: Option<String>,
    pub headings: Option<Vec<String>>,
    pub content: String,
    #[schema(value_type = Object)]
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DocumentChunk> for DocumentChunkBody {
    fn from(chunk: DocumentChunk) -> Self {
        Self {
            id: chunk.id,
            course_id: chunk.course_id,
            source: chunk.source,
            chunk_index: chunk.chunk_index,
            title: chunk.title,
            headings: chunk.headings,
            content: chunk.content,
            metadata: chunk.metadata,
            created_at: chunk.created_at,
            updated_at: chunk.updated_at,
        }
    }
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct BatchCreateRequest {
    pub documents: Vec<DocumentChunkPayload>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct BatchCreateResponse {
    pub documents: Vec<DocumentChunkBody>,
}

/// A partial update. Fields left out (or sent as null) keep their stored value.
#[derive(Deserialize, ToSchema, Debug, Default)]
pub struct UpdateDocumentRequest {
    pub source: Option<String>,
    pub chunk_index: Option<i64>,
    pub title: Option<String>,
    pub headings: Option<Vec<String>>,
    pub content: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<Metadata>,
}

impl UpdateDocumentRequest {
    pub fn into_patch(self) -> Result<ChunkPatch, ApiError> {
        if let Some(content) = &self.content {
            require_content(content)?;
        }
        Ok(ChunkPatch {
            source: self.source,
            chunk_index: self.chunk_index,
            title: self.title,
            headings: self.headings,
            content: self.content,
            metadata: self.metadata,
        })
    }
}

fn require_content(content: &str) -> Result<(), ApiError> {
    if content.trim().is_empty() {
        return Err(ApiError::Validation("content must not be empty".to_string()));
    }
    Ok(())
}

//=========================================================================================
// Search
//=========================================================================================

/// Retrieval mode. Only `lexical` is implemented; the others run the lexical path.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    #[default]
    Lexical,
    Vector,
    Hybrid,
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub mode: SearchMode,
}

impl SearchRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.page_size == 0 {
            return Err(ApiError::Validation(
                "page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct SearchResultItem {
    pub id: String,
    pub score: f32,
    pub course_id: String,
    pub source: Option<String>,
    pub chunk_index: Option<i64>,
    pub title: Option<String>,
    pub snippet: String,
    #[schema(value_type = Object)]
    pub metadata: Metadata,
}

impl From<SearchHit> for SearchResultItem {
    fn from(hit: SearchHit) -> Self {
        Self {
            id: hit.id,
            score: hit.score,
            course_id: hit.course_id,
            source: hit.source,
            chunk_index: hit.chunk_index,
            title: hit.title,
            snippet: hit.text,
            metadata: hit.metadata,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct SearchResponse {
    pub query: String,
    pub mode: SearchMode,
    pub results: Vec<SearchResultItem>,
    /// Always null: results fit on a single page.
    pub next_page_token: Option<String>,
}

/// Full chunk payload plus score, for use in RAG prompts.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct RagSearchResultItem {
    pub id: String,
    pub score: f32,
    pub course_id: String,
    pub source: Option<String>,
    pub chunk_index: Option<i64>,
    pub title: Option<String>,
    pub content: String,
    #[schema(value_type = Object)]
    pub metadata: Metadata,
}

impl From<SearchHit> for RagSearchResultItem {
    fn from(hit: SearchHit) -> Self {
        Self {
            id: hit.id,
            score: hit.score,
            course_id: hit.course_id,
            source: hit.source,
            chunk_index: hit.chunk_index,
            title: hit.title,
            content: hit.text,
            metadata: hit.metadata,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct RagSearchResponse {
    pub query: String,
    pub mode: SearchMode,
    pub results: Vec<RagSearchResultItem>,
}

//=========================================================================================
// Users
//=========================================================================================

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoleBody {
    Teacher,
    Student,
}

impl From<Role> for RoleBody {
    fn from(role: Role) -> Self {
        match role {
            Role::Teacher => RoleBody::Teacher,
            Role::Student => RoleBody::Student,
        }
    }
}

impl From<RoleBody> for Role {
    fn from(role: RoleBody) -> Self {
        match role {
            RoleBody::Teacher => Role::Teacher,
            RoleBody::Student => Role::Student,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct UserProfileBody {
    pub uid: String,
    pub role: RoleBody,
    pub department: Option<String>,
    pub courses: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfile> for UserProfileBody {
    fn from(profile: UserProfile) -> Self {
        Self {
            uid: profile.uid,
            role: profile.role.into(),
            department: profile.department,
            courses: profile.courses,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

#[derive(Deserialize, ToSchema, Debug, Default)]
pub struct UpsertMeRequest {
    pub role: Option<RoleBody>,
    pub department: Option<String>,
    pub courses: Option<Vec<String>>,
}

impl From<UpsertMeRequest> for ProfilePatch {
    fn from(req: UpsertMeRequest) -> Self {
        Self {
            role: req.role.map(Role::from),
            department: req.department,
            courses: req.courses,
        }
    }
}

//=========================================================================================
// Health
//=========================================================================================

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub courses: usize,
    pub global_documents: usize,
    /// Requests handled since startup, not counting this one.
    pub requests: u64,
    pub client_errors: u64,
    pub server_errors: u64,
}
