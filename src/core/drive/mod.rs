pub mod document_store;
pub mod drive_errors;
pub mod drive_models;
pub mod drive_transport;
pub mod multipart;

pub use document_store::RemoteDocumentStore;
pub use drive_errors::StoreError;
#[allow(unused_imports)]
pub use drive_models::{
    DocumentMetadata, DocumentSpec, DriveEndpoints, RemoteDocument, Session, UserProfile,
    APP_DATA_FOLDER, MULTIPART_BOUNDARY,
};
pub use drive_transport::{
    remote_api_error, DriveRequest, DriveResponse, HttpMethod, HttpTransport, LocalFileTransfer,
};
