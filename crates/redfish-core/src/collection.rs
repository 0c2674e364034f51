//! Concurrent, order-preserving collection resolution.
//!
//! A collection link resolves to an ordered list of member links (following
//! `Members@odata.nextLink` pages). Every member is then fetched by its own
//! task. Tasks report `(position, result)` on a channel drained by the
//! resolving call, which is the only writer of the result slots and the
//! failure map.
//!
//! Resolution is all-or-nothing: if any member fails, every successfully
//! fetched member is dropped and only the per-link [`CollectionError`] is
//! returned.

use crate::client::SharedClient;
use crate::entity::{fetch, Resource};
use crate::error::{CollectionError, Error, Result};
use crate::link::{CollectionPage, Link, Links};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, warn};

/// Upper bound on pages followed for a single collection.
pub const MAX_COLLECTION_PAGES: usize = 1024;

/// How many member fetches may be in flight at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Concurrency {
    /// One task per member, all started at once
    #[default]
    Unbounded,
    /// At most this many fetches in flight (a limit of 0 behaves as 1)
    Limited(usize),
}

impl Concurrency {
    fn limiter(self) -> Option<Arc<Semaphore>> {
        match self {
            Self::Unbounded => None,
            Self::Limited(limit) => Some(Arc::new(Semaphore::new(limit.max(1)))),
        }
    }
}

/// Resolves collection links into fully materialized members.
#[derive(Clone)]
pub struct CollectionResolver {
    client: SharedClient,
    concurrency: Concurrency,
}

impl CollectionResolver {
    /// Create a resolver with unbounded fan-out.
    #[must_use]
    pub fn new(client: SharedClient) -> Self {
        Self {
            client,
            concurrency: Concurrency::Unbounded,
        }
    }

    /// Set the fan-out strategy.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: Concurrency) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// The configured fan-out strategy.
    #[must_use]
    pub const fn concurrency(&self) -> Concurrency {
        self.concurrency
    }

    /// Read the member links of the collection at `uri`, in declared order.
    ///
    /// Paginated collections are followed page by page.
    ///
    /// # Errors
    ///
    /// Returns the transport or decode error of the first page that fails.
    pub async fn member_links(&self, uri: &str) -> Result<Links> {
        let mut members = Links::default();
        let mut next = Some(uri.to_string());
        let mut pages = 0;

        while let Some(page_uri) = next.take() {
            pages += 1;
            if pages > MAX_COLLECTION_PAGES {
                return Err(Error::InvalidRequest(format!(
                    "collection `{uri}` exceeds {MAX_COLLECTION_PAGES} pages"
                )));
            }

            let response = self.client.get(&page_uri).await?;
            let page: CollectionPage = serde_json::from_slice(response.body())
                .map_err(|err| Error::DecodeError(format!("collection `{page_uri}`: {err}")))?;

            members.extend(page.members);
            next = page
                .next_link
                .uri()
                .filter(|next_uri| *next_uri != page_uri)
                .map(str::to_string);
        }

        debug!(uri, members = members.len(), pages, "read collection");
        Ok(members)
    }

    /// Resolve the collection at `link` into its members, in declared order.
    ///
    /// An empty link resolves to an empty list without any request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Collection`] if the collection itself or any member
    /// cannot be fetched. A failure to read the collection is recorded under
    /// the collection link.
    pub async fn resolve<T: Resource>(&self, link: &Link) -> Result<Vec<T>> {
        let Some(uri) = link.uri() else {
            return Ok(Vec::new());
        };

        let members = match self.member_links(uri).await {
            Ok(members) => members,
            Err(err) => {
                warn!(uri, error = %err, "failed to read collection");
                let mut failures = CollectionError::new();
                failures.record(uri, err);
                return Err(Error::Collection(failures));
            }
        };

        self.resolve_links(&members).await
    }

    /// Fetch every link in `members` concurrently, returning items in list order.
    ///
    /// A link that appears more than once is fetched once per position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Collection`] holding one entry per failing link; no
    /// items are returned in that case.
    pub async fn resolve_links<T: Resource>(&self, members: &Links) -> Result<Vec<T>> {
        let links: Vec<Link> = members.iter().cloned().collect();
        if links.is_empty() {
            return Ok(Vec::new());
        }

        let (tx, mut rx) = mpsc::unbounded_channel::<(usize, Result<T>)>();
        let limiter = self.concurrency.limiter();

        for (index, link) in links.iter().enumerate() {
            let tx = tx.clone();
            let client = Arc::clone(&self.client);
            let limiter = limiter.clone();
            let link = link.clone();

            tokio::spawn(async move {
                let _permit = match limiter {
                    Some(limiter) => limiter.acquire_owned().await.ok(),
                    None => None,
                };

                let result = match link.uri() {
                    Some(uri) => fetch::<T>(&client, uri).await,
                    None => Err(Error::InvalidEndpoint(format!(
                        "collection member {index} has no @odata.id"
                    ))),
                };

                // The receiver only goes away if the resolving call was dropped.
                let _ = tx.send((index, result));
            });
        }
        drop(tx);

        let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(links.len()).collect();
        let mut failures = CollectionError::new();

        while let Some((index, result)) = rx.recv().await {
            match result {
                Ok(item) => slots[index] = Some(item),
                Err(err) => failures.record(links[index].as_str(), err),
            }
        }

        for (index, slot) in slots.iter().enumerate() {
            let link = links[index].as_str();
            if slot.is_none() && failures.get(link).is_none() {
                failures.record(
                    link,
                    Error::InternalError(format!("fetch task for `{link}` ended without a result")),
                );
            }
        }

        if !failures.is_empty() {
            warn!(
                failed = failures.len(),
                total = links.len(),
                "collection resolution failed"
            );
            return Err(Error::Collection(failures));
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

/// Resolve the collection at `link` with unbounded fan-out.
///
/// # Errors
///
/// See [`CollectionResolver::resolve`].
pub async fn resolve_collection<T: Resource>(client: &SharedClient, link: &Link) -> Result<Vec<T>> {
    CollectionResolver::new(Arc::clone(client))
        .resolve(link)
        .await
}
