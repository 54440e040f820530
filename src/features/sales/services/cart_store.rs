use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::features::sales::models::Cart;

/// In-process store of open carts.
///
/// A cart expires once it has not been touched for `ttl`.
pub struct CartStore {
    carts: Arc<RwLock<HashMap<Uuid, Cart>>>,
    ttl: Duration,
}

impl CartStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            carts: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    fn is_expired(&self, cart: &Cart, now: Instant) -> bool {
        now.duration_since(cart.touched_at) >= self.ttl
    }

    /// Open an empty cart and return its id
    pub async fn create(&self) -> Uuid {
        let cart = Cart::new();
        let id = cart.id;
        self.carts.write().await.insert(id, cart);
        id
    }

    /// Snapshot of a live cart
    pub async fn get(&self, id: Uuid) -> Option<Cart> {
        let carts = self.carts.read().await;
        carts
            .get(&id)
            .filter(|cart| !self.is_expired(cart, Instant::now()))
            .cloned()
    }

    /// Apply `f` to a live cart and refresh its expiry
    pub async fn update<F, R>(&self, id: Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let now = Instant::now();
        let mut carts = self.carts.write().await;
        let cart = carts.get_mut(&id)?;
        if self.is_expired(cart, now) {
            carts.remove(&id);
            return None;
        }
        cart.touched_at = now;
        Some(f(cart))
    }

    /// Remove a live cart and hand it over; nobody else sees it until restored
    pub async fn take(&self, id: Uuid) -> Option<Cart> {
        let cart = self.carts.write().await.remove(&id)?;
        (!self.is_expired(&cart, Instant::now())).then_some(cart)
    }

    /// Put back a cart obtained from [`take`](Self::take)
    pub async fn restore(&self, mut cart: Cart) {
        cart.touched_at = Instant::now();
        self.carts.write().await.insert(cart.id, cart);
    }

    /// Drop expired carts, returning how many went
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut carts = self.carts.write().await;
        let before = carts.len();
        carts.retain(|_, cart| !self.is_expired(cart, now));
        before - carts.len()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.carts.read().await.len()
    }
}
