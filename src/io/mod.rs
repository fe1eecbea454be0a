mod error;
mod fetch;
mod record;

pub use fetch::{HttpFetch, NetworkFetch, RCSB_DOWNLOAD_URL, Retriever, rcsb_retriever};

pub use record::{
    FieldSpec, RecordKind, StructureRecord, FIELD_CHAIN_ID, FIELD_RECORD_NAME, FIELD_RESIDUE_NAME,
};

pub use error::Error;
