// In-memory entity stores
//
// Stand-ins for the MySQL repositories in service and contract tests.
// Rows live in a BTreeMap keyed by id, so listings come back in id order.
// Deletes of ids marked as referenced fail the way a foreign key would.
// A save can be scripted to fail once with any store signal.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use dscatalog::categories::{Category, CategoryFilter};
use dscatalog::core::pagination::{Page, PageRequest};
use dscatalog::core::{DbId, EntityStore, StoreError, StoreResult};
use dscatalog::products::{Product, ProductFilter};
use dscatalog::roles::{Role, RoleFilter};
use dscatalog::users::{User, UserFilter, UserRepository};

/// Entity types the in-memory store can hold
pub trait Record: Clone + Send + Sync + 'static {
    const ENTITY: &'static str;

    type Filter: Send + Sync;

    fn id(&self) -> Option<DbId>;

    fn set_id(&mut self, id: DbId);

    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Value guarded by a unique index, if the table has one
    fn unique_key(&self) -> Option<String> {
        None
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle.map(str::trim).filter(|n| !n.is_empty()) {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

impl Record for Category {
    const ENTITY: &'static str = "Category";
    type Filter = CategoryFilter;

    fn id(&self) -> Option<DbId> {
        self.id
    }

    fn set_id(&mut self, id: DbId) {
        self.id = Some(id);
    }

    fn matches(&self, filter: &CategoryFilter) -> bool {
        contains_ignore_case(&self.name, filter.name.as_deref())
    }
}

impl Record for Product {
    const ENTITY: &'static str = "Product";
    type Filter = ProductFilter;

    fn id(&self) -> Option<DbId> {
        self.id
    }

    fn set_id(&mut self, id: DbId) {
        self.id = Some(id);
    }

    fn matches(&self, filter: &ProductFilter) -> bool {
        let in_category = match filter.category_id {
            Some(category_id) => self.categories.iter().any(|c| c.id == Some(category_id)),
            None => true,
        };
        in_category && contains_ignore_case(&self.name, filter.name.as_deref())
    }
}

impl Record for Role {
    const ENTITY: &'static str = "Role";
    type Filter = RoleFilter;

    fn id(&self) -> Option<DbId> {
        self.id
    }

    fn set_id(&mut self, id: DbId) {
        self.id = Some(id);
    }

    fn matches(&self, filter: &RoleFilter) -> bool {
        contains_ignore_case(&self.authority, filter.authority.as_deref())
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.authority.clone())
    }
}

impl Record for User {
    const ENTITY: &'static str = "User";
    type Filter = UserFilter;

    fn id(&self) -> Option<DbId> {
        self.id
    }

    fn set_id(&mut self, id: DbId) {
        self.id = Some(id);
    }

    fn matches(&self, filter: &UserFilter) -> bool {
        contains_ignore_case(&self.email, filter.email.as_deref())
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.email.clone())
    }
}

/// Entity store backed by a map, with call counters for assertions
pub struct InMemoryStore<T: Record> {
    rows: Mutex<BTreeMap<DbId, T>>,
    referenced: Mutex<HashSet<DbId>>,
    next_save_error: Mutex<Option<StoreError>>,
    next_id: AtomicI64,
    save_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl<T: Record> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> InMemoryStore<T> {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            referenced: Mutex::new(HashSet::new()),
            next_save_error: Mutex::new(None),
            next_id: AtomicI64::new(1),
            save_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
        }
    }

    /// Seed the store. Every row must already carry an id.
    pub fn with_rows(rows: Vec<T>) -> Self {
        let store = Self::new();
        {
            let mut map = store.rows.lock().unwrap();
            for row in rows {
                let id = row.id().expect("seeded rows need an id");
                map.insert(id, row);
            }
            let max = map.keys().max().copied().unwrap_or(0);
            store.next_id.store(max + 1, Ordering::SeqCst);
        }
        store
    }

    /// Make deletes of `id` fail as if other rows still pointed at it
    pub fn mark_referenced(&self, id: DbId) {
        self.referenced.lock().unwrap().insert(id);
    }

    /// Make the next `save` fail with `err` without touching any row
    pub fn fail_next_save(&self, err: StoreError) {
        *self.next_save_error.lock().unwrap() = Some(err);
    }

    pub fn get(&self, id: DbId) -> Option<T> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    fn check_unique(rows: &BTreeMap<DbId, T>, entity: &T) -> StoreResult<()> {
        let Some(key) = entity.unique_key() else {
            return Ok(());
        };

        let taken = rows
            .values()
            .any(|row| row.id() != entity.id() && row.unique_key().as_deref() == Some(key.as_str()));
        if taken {
            return Err(StoreError::UniqueViolation(format!(
                "Duplicate entry '{}' for {}",
                key,
                T::ENTITY
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Record> EntityStore<T> for InMemoryStore<T> {
    type Filter = T::Filter;

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<T>> {
        Ok(self.get(id))
    }

    async fn find_all_paged(&self, filter: &T::Filter, page: &PageRequest) -> StoreResult<Page<T>> {
        let rows = self.rows.lock().unwrap();
        let matching: Vec<&T> = rows.values().filter(|row| row.matches(filter)).collect();

        let content = matching
            .iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .map(|row| (*row).clone())
            .collect();

        Ok(Page::new(content, page, matching.len() as u64))
    }

    async fn save(&self, mut entity: T) -> StoreResult<T> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.next_save_error.lock().unwrap().take() {
            return Err(err);
        }
        let mut rows = self.rows.lock().unwrap();

        if let Some(id) = entity.id() {
            if !rows.contains_key(&id) {
                return Err(StoreError::RowAbsent { entity: T::ENTITY, id });
            }
        }
        Self::check_unique(&rows, &entity)?;

        if entity.id().is_none() {
            entity.set_id(self.next_id.fetch_add(1, Ordering::SeqCst));
        }

        if let Some(id) = entity.id() {
            rows.insert(id, entity.clone());
        }
        Ok(entity)
    }

    async fn delete_by_id(&self, id: DbId) -> StoreResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);

        if self.referenced.lock().unwrap().contains(&id) {
            return Err(StoreError::IntegrityViolation(format!(
                "Cannot delete {} {}: a foreign key constraint fails",
                T::ENTITY,
                id
            )));
        }

        match self.rows.lock().unwrap().remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::RowAbsent { entity: T::ENTITY, id }),
        }
    }

    async fn get_reference(&self, id: DbId) -> StoreResult<T> {
        self.get(id).ok_or(StoreError::RowAbsent { entity: T::ENTITY, id })
    }
}

#[async_trait]
impl UserRepository for InMemoryStore<User> {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|user| user.email == email)
            .cloned())
    }
}
