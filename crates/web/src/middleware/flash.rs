//! Flash notices: queued in the session, shown once on the next page.

use tower_sessions::Session;

use crate::models::{Flash, session_keys};

/// Queue a notice for the next rendered page.
///
/// Failures are logged and otherwise ignored; a lost notice never fails
/// the request.
pub async fn push_flash(session: &Session, flash: Flash) {
    let mut pending = pending(session).await;
    pending.push(flash);
    if let Err(e) = session.insert(session_keys::FLASH, pending).await {
        tracing::warn!(error = %e, "Failed to store flash notice");
    }
}

/// Take all queued notices, leaving none behind.
pub async fn take_flashes(session: &Session) -> Vec<Flash> {
    match session.remove::<Vec<Flash>>(session_keys::FLASH).await {
        Ok(flashes) => flashes.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read flash notices");
            Vec::new()
        }
    }
}

async fn pending(session: &Session) -> Vec<Flash> {
    session
        .get::<Vec<Flash>>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;
    use crate::models::FlashKind;

    #[tokio::test]
    async fn test_flashes_are_read_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);

        push_flash(&session, Flash::success("Product added.")).await;
        push_flash(&session, Flash::warning("Product deleted.")).await;

        let flashes = take_flashes(&session).await;
        assert_eq!(flashes.len(), 2);
        assert_eq!(flashes[0].kind, FlashKind::Success);
        assert_eq!(flashes[1].message, "Product deleted.");

        assert!(take_flashes(&session).await.is_empty());
    }
}
