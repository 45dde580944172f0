//! Per-type lifecycle hooks run once a queue item is resolved.

use crate::models::contrib::{ContribStatus, ContribType, Contribution, RevisionStatus};
use crate::models::queue::QueueItem;
use crate::store::{ContribStore, StoreResult};

pub async fn on_approve(store: &dyn ContribStore, contrib: &Contribution, item: &QueueItem) -> StoreResult<()> {
    store
        .set_revision_status(item.revision_id, RevisionStatus::Approved)
        .await?;

    // Translations are never install-tested, so they carry no version tags.
    if contrib.contrib_type != ContribType::Translation {
        store.mark_version_tags_validated(item.revision_id).await?;
    }

    if contrib.status != ContribStatus::Approved {
        store
            .set_contrib_status(contrib.id, ContribStatus::Approved)
            .await?;
    }

    log::info!(
        "{} '{}' revision {} approved",
        contrib.contrib_type,
        contrib.name,
        item.revision_id
    );
    Ok(())
}

pub async fn on_deny(store: &dyn ContribStore, contrib: &Contribution, item: &QueueItem) -> StoreResult<()> {
    store
        .set_revision_status(item.revision_id, RevisionStatus::Denied)
        .await?;

    // A first submission that is denied leaves nothing public behind.
    if contrib.status == ContribStatus::New {
        store
            .set_contrib_status(contrib.id, ContribStatus::Denied)
            .await?;
    }

    log::info!(
        "{} '{}' revision {} denied",
        contrib.contrib_type,
        contrib.name,
        item.revision_id
    );
    Ok(())
}
