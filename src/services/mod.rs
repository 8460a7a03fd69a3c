pub mod gateway;
pub mod import_service;
pub mod row_service;
pub mod schema_service;

pub use gateway::{MutationGateway, Op, OpOutcome, RowQuery, SheetPage};
pub use import_service::{ImportService, ImportSummary};
pub use row_service::RowService;
pub use schema_service::SchemaService;

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{Mutex as TokioMutex, OwnedMutexGuard};

use crate::database::entities::{projects, row_grants, sheets, workbooks};
use crate::permissions::{RowGrant, SheetContext};

/// Per-sheet write locks serializing row-number assignment.
///
/// `create_row` and `import_rows` must not interleave within one sheet, or
/// concurrent inserts could compute the same next row number. Lock scope is
/// this process; the unique (sheet_id, row_number) index backstops it.
#[derive(Default)]
pub struct SheetLocks {
    inner: StdMutex<HashMap<i32, Arc<TokioMutex<()>>>>,
}

impl SheetLocks {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn acquire(&self, sheet_id: i32) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().expect("sheet lock map poisoned");
            map.entry(sheet_id)
                .or_insert_with(|| Arc::new(TokioMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

/// The fully-resolved ancestry of one sheet, loaded fresh per request.
/// Every request-handling path goes through this load, so soft-deleted
/// ancestors make the whole subtree unaddressable.
#[derive(Debug, Clone)]
pub struct SheetScope {
    pub project: projects::Model,
    pub workbook: workbooks::Model,
    pub sheet: sheets::Model,
    pub grants: Vec<row_grants::Model>,
}

impl SheetScope {
    pub fn context(&self) -> SheetContext {
        SheetContext {
            supervisor_ids: self.project.supervisor_id_set(),
            project_agent_ids: self.project.agent_id_set(),
            workbook_agent_ids: self.workbook.agent_id_set(),
            sheet_agent_ids: self.sheet.agent_id_set(),
            grants: self.grants.iter().map(RowGrant::from).collect(),
        }
    }
}
