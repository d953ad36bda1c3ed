//! Method dispatch for the history bridge
//!
//! Each handler decodes its params, submits the history operation right away
//! (fixing its queue position in request order) and returns a future for the
//! reply envelope.

use std::future::Future;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HistoryResult;
use crate::history::{ConversionOutcome, HistoryManager};
use crate::protocol::IpcReply;
use crate::types::{EntryDraft, FileType};

pub const GET_ALL: &str = "history/getAll";
pub const ADD: &str = "history/add";
pub const REMOVE: &str = "history/remove";
pub const CLEAR: &str = "history/clear";
pub const FILTER_BY_TYPE: &str = "history/filterByType";
pub const GET_COUNTS: &str = "history/getCounts";
pub const RECORD_CONVERSION: &str = "history/recordConversion";

/// Why a request could not be dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    MethodNotFound,
    InvalidParams(String),
}

#[derive(Deserialize)]
struct RemoveParams {
    id: String,
}

#[derive(Deserialize)]
struct FilterParams {
    #[serde(rename = "fileType")]
    file_type: FileType,
}

/// Start the history operation named by `method`
pub fn dispatch(
    manager: &HistoryManager,
    method: &str,
    params: Option<Value>,
) -> Result<BoxFuture<'static, IpcReply>, DispatchError> {
    match method {
        GET_ALL => Ok(reply(manager.get_all())),
        ADD => {
            let draft: EntryDraft = decode(params)?;
            Ok(reply(manager.add_entry(draft)))
        }
        REMOVE => {
            let RemoveParams { id } = decode(params)?;
            Ok(reply(manager.remove_entry(id)))
        }
        CLEAR => Ok(reply(manager.clear_all())),
        FILTER_BY_TYPE => {
            let FilterParams { file_type } = decode(params)?;
            Ok(reply(manager.filter_by_type(file_type)))
        }
        GET_COUNTS => Ok(reply(manager.get_entry_counts())),
        RECORD_CONVERSION => {
            let outcome: ConversionOutcome = decode(params)?;
            let recorded = manager.record_conversion(&outcome);
            Ok(async move { IpcReply::data(recorded.await) }.boxed())
        }
        _ => Err(DispatchError::MethodNotFound),
    }
}

fn reply<T, F>(operation: F) -> BoxFuture<'static, IpcReply>
where
    T: Serialize,
    F: Future<Output = HistoryResult<T>> + Send + 'static,
{
    async move { IpcReply::from_result(operation.await) }.boxed()
}

fn decode<T: DeserializeOwned>(params: Option<Value>) -> Result<T, DispatchError> {
    let params =
        params.ok_or_else(|| DispatchError::InvalidParams("missing params".to_string()))?;
    serde_json::from_value(params).map_err(|e| DispatchError::InvalidParams(e.to_string()))
}
