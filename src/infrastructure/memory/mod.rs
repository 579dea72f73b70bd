//! In-memory adapters for the application ports.
//!
//! They keep the same contracts as the Postgres and Kafka adapters (atomic
//! prepared-count updates, versioned shelf writes) and back the unit and
//! scenario test suites.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use anyhow::bail;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::dto::requests::RequestStatusDto;
use crate::application::ports::event_publisher::{
    KitchenRequestPublisher, RequestStatusPublisher, ShelfEventPublisher,
};
use crate::application::ports::menu_item_repository::MenuItemRepository;
use crate::application::ports::request_repository::{NewRequestLine, RequestRepository};
use crate::application::ports::shelf_repository::ShelfRepository;
use crate::application::ports::status_notifier::StatusNotifier;
use crate::domain::events::event::{KitchenWorkerRequest, RequestStatusChange, ShelfEvent};
use crate::domain::requests::menu_item::MenuItem;
use crate::domain::requests::request::{Request, RequestMenuItem, RequestStatus};
use crate::domain::shelf::shelf_item::ShelfItem;

#[derive(Debug, Default)]
pub struct InMemoryMenuItems {
    items: Vec<MenuItem>,
}

impl InMemoryMenuItems {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl MenuItemRepository for InMemoryMenuItems {
    async fn list_all(&self) -> anyhow::Result<Vec<MenuItem>> {
        Ok(self.items.clone())
    }

    async fn find_by_ids(&self, ids: &[i32]) -> anyhow::Result<Vec<MenuItem>> {
        Ok(self
            .items
            .iter()
            .filter(|m| ids.contains(&m.id))
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
struct RequestState {
    requests: BTreeMap<i32, Request>,
    lines: Vec<RequestMenuItem>,
    next_request_id: i32,
    next_line_id: i32,
}

#[derive(Debug, Default)]
pub struct InMemoryRequests {
    state: Mutex<RequestState>,
}

impl InMemoryRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a stored request; later generated ids continue after the seeded ones.
    pub async fn seed(&self, request: Request, lines: Vec<RequestMenuItem>) {
        let mut state = self.state.lock().await;
        state.next_request_id = state.next_request_id.max(request.id);
        for line in &lines {
            state.next_line_id = state.next_line_id.max(line.id);
        }
        state.requests.insert(request.id, request);
        state.lines.extend(lines);
    }

    pub async fn stored_status(&self, request_id: i32) -> Option<RequestStatus> {
        let state = self.state.lock().await;
        state.requests.get(&request_id).map(|r| r.status)
    }
}

#[async_trait]
impl RequestRepository for InMemoryRequests {
    async fn create_with_lines(
        &self,
        customer_id: i32,
        lines: &[NewRequestLine],
    ) -> anyhow::Result<(Request, Vec<RequestMenuItem>)> {
        let mut state = self.state.lock().await;
        state.next_request_id += 1;
        let request = Request {
            id: state.next_request_id,
            customer_id,
            status: RequestStatus::New,
        };
        let mut stored = Vec::with_capacity(lines.len());
        for line in lines {
            state.next_line_id += 1;
            stored.push(RequestMenuItem {
                id: state.next_line_id,
                request_id: request.id,
                menu_item_id: line.menu_item_id,
                quantity: line.quantity,
                prepared: 0,
                immediate: line.immediate,
            });
        }
        state.requests.insert(request.id, request.clone());
        state.lines.extend(stored.iter().cloned());
        Ok((request, stored))
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Request>> {
        Ok(self.state.lock().await.requests.get(&id).cloned())
    }

    async fn find_by_statuses(&self, statuses: &[RequestStatus]) -> anyhow::Result<Vec<Request>> {
        let state = self.state.lock().await;
        Ok(state
            .requests
            .values()
            .filter(|r| statuses.contains(&r.status))
            .cloned()
            .collect())
    }

    async fn update_status(&self, id: i32, status: RequestStatus) -> anyhow::Result<bool> {
        let mut state = self.state.lock().await;
        match state.requests.get_mut(&id) {
            Some(request) => {
                request.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_lines(&self, request_id: i32) -> anyhow::Result<Vec<RequestMenuItem>> {
        let state = self.state.lock().await;
        Ok(state
            .lines
            .iter()
            .filter(|l| l.request_id == request_id)
            .cloned()
            .collect())
    }

    async fn find_line(
        &self,
        request_id: i32,
        menu_item_id: i32,
    ) -> anyhow::Result<Option<RequestMenuItem>> {
        let state = self.state.lock().await;
        Ok(state
            .lines
            .iter()
            .find(|l| l.request_id == request_id && l.menu_item_id == menu_item_id)
            .cloned())
    }

    async fn add_prepared(
        &self,
        request_id: i32,
        menu_item_id: i32,
        delta: i32,
    ) -> anyhow::Result<Option<RequestMenuItem>> {
        let mut state = self.state.lock().await;
        let Some(line) = state
            .lines
            .iter_mut()
            .find(|l| l.request_id == request_id && l.menu_item_id == menu_item_id)
        else {
            return Ok(None);
        };
        if line.prepared + delta > line.quantity {
            return Ok(None);
        }
        *line = line.with_prepared(delta);
        Ok(Some(line.clone()))
    }
}

#[derive(Debug, Default)]
struct ShelfState {
    items: Vec<ShelfItem>,
    next_id: i32,
}

#[derive(Debug, Default)]
pub struct InMemoryShelf {
    state: Mutex<ShelfState>,
    injected_conflicts: AtomicU32,
}

impl InMemoryShelf {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, item: ShelfItem) {
        let mut state = self.state.lock().await;
        state.next_id = state.next_id.max(item.id);
        state.items.push(item);
    }

    /// Makes the next `count` versioned updates lose their race.
    pub fn inject_conflicts(&self, count: u32) {
        self.injected_conflicts.store(count, Ordering::SeqCst);
    }

    pub async fn snapshot(&self, menu_item_id: i32) -> Option<ShelfItem> {
        let state = self.state.lock().await;
        state
            .items
            .iter()
            .find(|i| i.menu_item_id == menu_item_id)
            .cloned()
    }
}

#[async_trait]
impl ShelfRepository for InMemoryShelf {
    async fn find_by_menu_item(&self, menu_item_id: i32) -> anyhow::Result<Option<ShelfItem>> {
        Ok(self.snapshot(menu_item_id).await)
    }

    async fn insert(&self, item: &ShelfItem) -> anyhow::Result<ShelfItem> {
        let mut state = self.state.lock().await;
        if let Some(existing) = state
            .items
            .iter()
            .find(|i| i.menu_item_id == item.menu_item_id)
        {
            return Ok(existing.clone());
        }
        state.next_id += 1;
        let stored = ShelfItem {
            id: state.next_id,
            ..item.clone()
        };
        state.items.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, item: &ShelfItem, expected_version: i64) -> anyhow::Result<bool> {
        let pending = self.injected_conflicts.load(Ordering::SeqCst);
        if pending > 0 {
            self.injected_conflicts.store(pending - 1, Ordering::SeqCst);
            return Ok(false);
        }
        let mut state = self.state.lock().await;
        let Some(stored) = state.items.iter_mut().find(|i| i.id == item.id) else {
            bail!("shelf item {} does not exist", item.id);
        };
        if stored.version != expected_version {
            return Ok(false);
        }
        *stored = item.clone();
        Ok(true)
    }
}

/// Publisher that keeps every message it was asked to send.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    shelf_events: Mutex<Vec<ShelfEvent>>,
    status_changes: Mutex<Vec<RequestStatusChange>>,
    kitchen_requests: Mutex<Vec<KitchenWorkerRequest>>,
    notifications: Mutex<Vec<RequestStatusDto>>,
    failing: AtomicBool,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every publish call fails afterwards, as if the broker were down.
    pub fn failing() -> Self {
        let publisher = Self::default();
        publisher.failing.store(true, Ordering::SeqCst);
        publisher
    }

    pub async fn shelf_events(&self) -> Vec<ShelfEvent> {
        self.shelf_events.lock().await.clone()
    }

    pub async fn status_changes(&self) -> Vec<RequestStatusChange> {
        self.status_changes.lock().await.clone()
    }

    pub async fn kitchen_requests(&self) -> Vec<KitchenWorkerRequest> {
        self.kitchen_requests.lock().await.clone()
    }

    pub async fn notifications(&self) -> Vec<RequestStatusDto> {
        self.notifications.lock().await.clone()
    }

    fn check_available(&self) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("message bus unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl ShelfEventPublisher for RecordingPublisher {
    async fn publish_shelf_event(&self, event: &ShelfEvent) -> anyhow::Result<()> {
        self.check_available()?;
        self.shelf_events.lock().await.push(event.clone());
        Ok(())
    }
}

#[async_trait]
impl RequestStatusPublisher for RecordingPublisher {
    async fn publish_status_change(&self, change: &RequestStatusChange) -> anyhow::Result<()> {
        self.check_available()?;
        self.status_changes.lock().await.push(change.clone());
        Ok(())
    }
}

#[async_trait]
impl KitchenRequestPublisher for RecordingPublisher {
    async fn request_items(&self, request: &KitchenWorkerRequest) -> anyhow::Result<()> {
        self.check_available()?;
        self.kitchen_requests.lock().await.push(request.clone());
        Ok(())
    }
}

#[async_trait]
impl StatusNotifier for RecordingPublisher {
    async fn notify(&self, notification: &RequestStatusDto) -> anyhow::Result<()> {
        self.check_available()?;
        self.notifications.lock().await.push(*notification);
        Ok(())
    }
}
