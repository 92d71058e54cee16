//! In-memory ports for use case tests

use crate::config::WaitPolicy;
use crate::ports::browser::{BrowserError, BrowserPort, ENTER, ElementHandle, PageMarker};
use crate::ports::record_store::{RecordStore, StoreError};
use crate::ports::secrets::{SecretError, SecretProvider};
use async_trait::async_trait;
use harvest_domain::{Locator, OutputLayout, RecordDocument, RecordId};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn fast_policy() -> WaitPolicy {
    WaitPolicy::default()
        .with_timeout(Duration::from_secs(5))
        .with_poll_interval(Duration::from_millis(100))
        .with_retry_delay(Duration::from_millis(100))
        .with_retry_attempts(3)
}

#[derive(Debug, Clone)]
pub struct FakeElement {
    locator: Locator,
    visible: bool,
    selected: bool,
    text: String,
    attributes: HashMap<String, String>,
    click_to: Option<String>,
    enter_to: Option<String>,
}

impl FakeElement {
    pub fn new(locator: Locator) -> Self {
        Self {
            locator,
            visible: true,
            selected: false,
            text: String::new(),
            attributes: HashMap::new(),
            click_to: None,
            enter_to: None,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Clicking navigates to `url`
    pub fn click_to(mut self, url: &str) -> Self {
        self.click_to = Some(url.to_string());
        self
    }

    /// Typing Enter navigates to `url`
    pub fn enter_to(mut self, url: &str) -> Self {
        self.enter_to = Some(url.to_string());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakePage {
    elements: Vec<FakeElement>,
    /// Successive `page_source` results; the last one repeats
    sources: Vec<Result<String, BrowserError>>,
    redirect: Option<String>,
    polls: usize,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(mut self, element: FakeElement) -> Self {
        self.elements.push(element);
        self
    }

    pub fn source(mut self, source: &str) -> Self {
        self.sources.push(Ok(source.to_string()));
        self
    }

    /// The next `page_source` call fails with `error`
    pub fn source_error(mut self, error: BrowserError) -> Self {
        self.sources.push(Err(error));
        self
    }

    pub fn redirect_to(mut self, url: &str) -> Self {
        self.redirect = Some(url.to_string());
        self
    }
}

#[derive(Default)]
struct BrowserState {
    pages: HashMap<String, FakePage>,
    current: String,
    generation: usize,
    history: Vec<String>,
    navigations: Vec<String>,
    typed: Vec<String>,
}

impl BrowserState {
    fn go(&mut self, url: &str) {
        self.generation += 1;
        self.history.push(url.to_string());
        let target = self
            .pages
            .get(url)
            .and_then(|p| p.redirect.clone())
            .unwrap_or_else(|| url.to_string());
        if target != url {
            self.history.push(target.clone());
        }
        if let Some(page) = self.pages.get_mut(&target) {
            page.polls = 0;
        }
        self.current = target;
    }

    fn element_mut(&mut self, handle: &ElementHandle) -> Result<&mut FakeElement, BrowserError> {
        let (generation, index) = handle
            .id()
            .split_once(':')
            .and_then(|(g, i)| Some((g.parse::<usize>().ok()?, i.parse::<usize>().ok()?)))
            .ok_or_else(|| BrowserError::ProtocolError(format!("bad handle {}", handle.id())))?;
        if generation != self.generation {
            return Err(BrowserError::StaleElement(handle.id().to_string()));
        }
        self.pages
            .get_mut(&self.current)
            .and_then(|p| p.elements.get_mut(index))
            .ok_or_else(|| BrowserError::NoSuchElement(handle.id().to_string()))
    }
}

/// Scripted browser: a set of pages keyed by URL, with elements matched by
/// exact locator equality.
#[derive(Default)]
pub struct FakeBrowser {
    state: Mutex<BrowserState>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&self, url: &str, page: FakePage) {
        self.state.lock().unwrap().pages.insert(url.to_string(), page);
    }

    pub fn current(&self) -> String {
        self.state.lock().unwrap().current.clone()
    }

    /// URLs passed to `navigate`, in order
    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().unwrap().navigations.clone()
    }

    /// Whether the browser ever showed `url`
    pub fn visited(&self, url: &str) -> bool {
        self.state.lock().unwrap().history.iter().any(|u| u == url)
    }

    pub fn typed(&self) -> Vec<String> {
        self.state.lock().unwrap().typed.clone()
    }

    pub fn is_checked(&self, url: &str, locator: &Locator) -> bool {
        self.state
            .lock()
            .unwrap()
            .pages
            .get(url)
            .and_then(|p| p.elements.iter().find(|e| &e.locator == locator))
            .is_some_and(|e| e.selected)
    }
}

#[async_trait]
impl BrowserPort for FakeBrowser {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        let mut state = self.state.lock().unwrap();
        state.navigations.push(url.to_string());
        state.go(url);
        Ok(())
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        Ok(self.current())
    }

    async fn page_source(&self) -> Result<String, BrowserError> {
        let mut state = self.state.lock().unwrap();
        let current = state.current.clone();
        let Some(page) = state.pages.get_mut(&current) else {
            return Ok("<html></html>".to_string());
        };
        let index = page.polls.min(page.sources.len().saturating_sub(1));
        page.polls += 1;
        page.sources
            .get(index)
            .cloned()
            .unwrap_or_else(|| Ok("<html></html>".to_string()))
    }

    async fn locate(
        &self,
        locator: &Locator,
        visible_only: bool,
    ) -> Result<Vec<ElementHandle>, BrowserError> {
        let state = self.state.lock().unwrap();
        let Some(page) = state.pages.get(&state.current) else {
            return Ok(Vec::new());
        };
        Ok(page
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| &e.locator == locator && (e.visible || !visible_only))
            .map(|(i, _)| ElementHandle::new(format!("{}:{}", state.generation, i)))
            .collect())
    }

    async fn text(&self, element: &ElementHandle) -> Result<String, BrowserError> {
        Ok(self.state.lock().unwrap().element_mut(element)?.text.clone())
    }

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        let mut state = self.state.lock().unwrap();
        Ok(state.element_mut(element)?.attributes.get(name).cloned())
    }

    async fn is_selected(&self, element: &ElementHandle) -> Result<bool, BrowserError> {
        Ok(self.state.lock().unwrap().element_mut(element)?.selected)
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), BrowserError> {
        let mut state = self.state.lock().unwrap();
        let target = state.element_mut(element)?;
        match target.click_to.clone() {
            Some(url) => state.go(&url),
            None => target.selected = !target.selected,
        }
        Ok(())
    }

    async fn type_text(&self, element: &ElementHandle, text: &str) -> Result<(), BrowserError> {
        let mut state = self.state.lock().unwrap();
        let enter_to = state.element_mut(element)?.enter_to.clone();
        state.typed.push(text.to_string());
        if let Some(url) = enter_to.filter(|_| text.contains(ENTER)) {
            state.go(&url);
        }
        Ok(())
    }

    async fn page_marker(&self) -> Result<PageMarker, BrowserError> {
        Ok(PageMarker::new(self.state.lock().unwrap().generation.to_string()))
    }

    async fn page_replaced(&self, marker: &PageMarker) -> Result<bool, BrowserError> {
        Ok(self.state.lock().unwrap().generation.to_string() != marker.id())
    }
}

/// Secrets with a fixed password and a queue of one-time codes
pub struct StaticSecrets {
    password: String,
    codes: Mutex<Vec<String>>,
    password_calls: AtomicUsize,
    code_calls: AtomicUsize,
}

impl StaticSecrets {
    pub fn new(password: &str) -> Self {
        Self {
            password: password.to_string(),
            codes: Mutex::new(Vec::new()),
            password_calls: AtomicUsize::new(0),
            code_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_codes(self, codes: &[&str]) -> Self {
        *self.codes.lock().unwrap() = codes.iter().rev().map(|c| c.to_string()).collect();
        self
    }

    pub fn password_calls(&self) -> usize {
        self.password_calls.load(Ordering::SeqCst)
    }

    pub fn code_calls(&self) -> usize {
        self.code_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretProvider for StaticSecrets {
    async fn password(&self, _id: &str) -> Result<String, SecretError> {
        self.password_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.password.clone())
    }

    async fn one_time_code(&self, id: &str) -> Result<String, SecretError> {
        self.code_calls.fetch_add(1, Ordering::SeqCst);
        self.codes
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| SecretError::NotFound(id.to_string()))
    }
}

/// Record store keeping written documents in memory
pub struct MemoryStore {
    layout: OutputLayout,
    prepared: Mutex<bool>,
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemoryStore {
    pub fn new(root: &str, dir_per_year: bool) -> Self {
        Self {
            layout: OutputLayout::new(root, dir_per_year),
            prepared: Mutex::new(false),
            files: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn is_prepared(&self) -> bool {
        *self.prepared.lock().unwrap()
    }

    pub fn written(&self) -> Vec<PathBuf> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }
}

impl RecordStore for MemoryStore {
    fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    fn prepare(&self) -> Result<(), StoreError> {
        *self.prepared.lock().unwrap() = true;
        Ok(())
    }

    fn persisted_ids(&self) -> Result<HashSet<RecordId>, StoreError> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter_map(|p| OutputLayout::id_from_path(p))
            .collect())
    }

    fn write(&self, document: &RecordDocument) -> Result<PathBuf, StoreError> {
        let path = self.layout.path_for(document)?;
        self.files
            .lock()
            .unwrap()
            .insert(path.clone(), document.to_file_contents());
        Ok(path)
    }
}
