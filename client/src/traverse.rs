//! Group tree traversal
//!
//! Applications are visited pre-order: every application owned directly by a
//! group comes before anything in its child groups, and children are visited
//! in list order. Visits never short-circuit; each failure is recorded and
//! the walk carries on. The plain entry points then report only the *last*
//! failure seen, while [`BulkReport`] keeps every one of them.

use futures::future::BoxFuture;
use tracing::debug;

use marathon_models::{AppDefinition, Group};

use crate::errors::ClientError;

/// Lazy pre-order iterator over the applications of a group subtree
pub struct Walk<'a> {
    apps: std::slice::Iter<'a, AppDefinition>,
    pending: Vec<&'a Group>,
}

impl<'a> Walk<'a> {
    pub fn new(root: &'a Group) -> Self {
        Self {
            apps: Default::default(),
            pending: vec![root],
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a AppDefinition;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(app) = self.apps.next() {
                return Some(app);
            }
            let group = self.pending.pop()?;
            debug!("Traverse: group id => {}", group.id);
            self.apps = group.apps.iter();
            // reversed so the first child is popped first
            self.pending.extend(group.groups.iter().rev());
        }
    }
}

/// Walk the applications of `group` in traversal order
pub fn walk(group: &Group) -> Walk<'_> {
    Walk::new(group)
}

/// Outcome of a bulk operation over many applications
#[derive(Debug, Default)]
pub struct BulkReport {
    /// Every application id visited, in order
    pub visited: Vec<String>,
    /// Every failure, in order of occurrence
    pub failures: Vec<(String, ClientError)>,
}

impl BulkReport {
    pub fn record(&mut self, id: &str, result: Result<(), ClientError>) {
        self.visited.push(id.to_string());
        if let Err(e) = result {
            debug!("Traverse: {} failed: {}", id, e);
            self.failures.push((id.to_string(), e));
        }
    }

    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.visited.len() - self.failures.len()
    }

    pub fn last_error(&self) -> Option<&ClientError> {
        self.failures.last().map(|(_, e)| e)
    }

    /// Collapse to the last failure seen, if any
    pub fn into_last_error(mut self) -> Result<(), ClientError> {
        match self.failures.pop() {
            Some((_, e)) => Err(e),
            None => Ok(()),
        }
    }
}

/// Invoke `callback` with every application id of the subtree
pub fn traverse<F>(group: &Group, mut callback: F) -> Result<(), ClientError>
where
    F: FnMut(&str) -> Result<(), ClientError>,
{
    traverse_definitions(group, |app| callback(&app.id))
}

/// Invoke `callback` with every application definition of the subtree
pub fn traverse_definitions<F>(group: &Group, callback: F) -> Result<(), ClientError>
where
    F: FnMut(&AppDefinition) -> Result<(), ClientError>,
{
    traverse_report(group, callback).into_last_error()
}

/// Like [`traverse_definitions`] but keeps every failure
pub fn traverse_report<F>(group: &Group, mut callback: F) -> BulkReport
where
    F: FnMut(&AppDefinition) -> Result<(), ClientError>,
{
    let mut report = BulkReport::default();
    for app in walk(group) {
        report.record(&app.id, callback(app));
    }
    report
}

/// Asynchronous visitor: each callback future is awaited before the next
/// application is visited
pub async fn traverse_async<'g, F>(group: &'g Group, mut callback: F) -> BulkReport
where
    F: FnMut(&'g AppDefinition) -> BoxFuture<'g, Result<(), ClientError>>,
{
    let mut report = BulkReport::default();
    for app in walk(group) {
        let result = callback(app).await;
        report.record(&app.id, result);
    }
    report
}
