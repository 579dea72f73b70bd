use async_trait::async_trait;

use crate::domain::requests::request::{Request, RequestMenuItem, RequestStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequestLine {
    pub menu_item_id: i32,
    pub quantity: i32,
    pub immediate: bool,
}

#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// Stores a `NEW` request together with its lines in one transaction.
    async fn create_with_lines(
        &self,
        customer_id: i32,
        lines: &[NewRequestLine],
    ) -> anyhow::Result<(Request, Vec<RequestMenuItem>)>;

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Request>>;

    async fn find_by_statuses(&self, statuses: &[RequestStatus]) -> anyhow::Result<Vec<Request>>;

    /// Returns false when no request with `id` exists.
    async fn update_status(&self, id: i32, status: RequestStatus) -> anyhow::Result<bool>;

    async fn list_lines(&self, request_id: i32) -> anyhow::Result<Vec<RequestMenuItem>>;

    async fn find_line(
        &self,
        request_id: i32,
        menu_item_id: i32,
    ) -> anyhow::Result<Option<RequestMenuItem>>;

    /// Atomically adds `delta` to the prepared count of a line. Returns None
    /// when the line does not exist or the count would exceed its quantity.
    async fn add_prepared(
        &self,
        request_id: i32,
        menu_item_id: i32,
        delta: i32,
    ) -> anyhow::Result<Option<RequestMenuItem>>;
}
