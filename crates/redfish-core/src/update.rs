//! Snapshot capture and diff-based partial updates.
//!
//! A mutable resource keeps the exact bytes it was decoded from in a
//! [`Snapshot`]. On update the snapshot is decoded again into an "original"
//! instance, each field in the kind's declared [`MutableField`] table is
//! compared between original and live instance, and only the differences are
//! sent back with a PATCH.
//!
//! Mutable fields are declared with [`mutable_fields!`](crate::mutable_fields),
//! which checks the accessor against the struct at compile time:
//!
//! ```ignore
//! impl Updatable for SessionService {
//!     const MUTABLE_FIELDS: &'static [MutableField<Self>] = redfish_core::mutable_fields!(SessionService {
//!         "ServiceEnabled" => service_enabled,
//!         "SessionTimeout" => session_timeout,
//!     });
//!
//!     fn snapshot(&self) -> &Snapshot {
//!         &self.snapshot
//!     }
//! }
//! ```

use crate::client::SharedClient;
use crate::entity::Resource;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// The raw representation a resource was decoded from.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    raw: Option<Arc<[u8]>>,
}

impl Snapshot {
    /// Store `raw` verbatim as the diff baseline.
    pub fn capture(&mut self, raw: &[u8]) {
        self.raw = Some(Arc::from(raw));
    }

    /// Returns true once a representation has been captured.
    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.raw.is_some()
    }

    /// The captured bytes, if any.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.raw.as_deref()
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Some(raw) => write!(f, "Snapshot({} bytes)", raw.len()),
            None => f.write_str("Snapshot(empty)"),
        }
    }
}

/// A writable field: its wire name and how to read its value from a resource.
pub struct MutableField<T> {
    name: &'static str,
    read: fn(&T) -> serde_json::Result<Value>,
}

impl<T> MutableField<T> {
    /// Declare a writable field.
    #[must_use]
    pub const fn new(name: &'static str, read: fn(&T) -> serde_json::Result<Value>) -> Self {
        Self { name, read }
    }

    /// Wire name of the field.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Read the field's current value as JSON.
    ///
    /// # Errors
    ///
    /// Returns a decode error if the value cannot be represented as JSON.
    pub fn read(&self, resource: &T) -> Result<Value> {
        (self.read)(resource).map_err(|err| {
            Error::DecodeError(format!("cannot serialize field `{}`: {err}", self.name))
        })
    }
}

impl<T> fmt::Debug for MutableField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MutableField").field(&self.name).finish()
    }
}

/// Declare the mutable field table of a resource kind.
///
/// Each entry maps a wire name to a struct field; the field must implement
/// `serde::Serialize`.
#[macro_export]
macro_rules! mutable_fields {
    ($ty:ty { $($name:literal => $field:ident),+ $(,)? }) => {
        &[
            $(
                $crate::update::MutableField::<$ty>::new($name, |resource: &$ty| {
                    $crate::__private::serde_json::to_value(&resource.$field)
                }),
            )+
        ]
    };
}

/// Compare `original` and `live` over `fields`, returning the changed fields
/// with their live values.
///
/// When both values of a field are JSON objects only the changed members are
/// kept, recursively. Members present in `original` but gone from `live` are
/// sent as `null`.
///
/// # Errors
///
/// Returns an error if a field value cannot be represented as JSON.
pub fn diff<T>(original: &T, live: &T, fields: &[MutableField<T>]) -> Result<Map<String, Value>> {
    let mut patch = Map::new();

    for field in fields {
        let before = field.read(original)?;
        let after = field.read(live)?;
        if let Some(change) = delta(&before, &after) {
            patch.insert(field.name().to_string(), change);
        }
    }

    Ok(patch)
}

fn delta(before: &Value, after: &Value) -> Option<Value> {
    match (before, after) {
        (Value::Object(before), Value::Object(after)) => {
            let mut changed = Map::new();
            for (key, value) in after {
                match before.get(key) {
                    Some(previous) => {
                        if let Some(change) = delta(previous, value) {
                            changed.insert(key.clone(), change);
                        }
                    }
                    None => {
                        changed.insert(key.clone(), value.clone());
                    }
                }
            }
            for key in before.keys() {
                if !after.contains_key(key) {
                    changed.insert(key.clone(), Value::Null);
                }
            }

            if changed.is_empty() {
                None
            } else {
                Some(Value::Object(changed))
            }
        }
        (before, after) if before == after => None,
        (_, after) => Some(after.clone()),
    }
}

/// A resource kind that can be partially updated.
#[async_trait]
pub trait Updatable: Resource + Sync {
    /// The fields that may appear in an update payload.
    const MUTABLE_FIELDS: &'static [MutableField<Self>];

    /// The representation this instance was decoded from.
    fn snapshot(&self) -> &Snapshot;

    /// Compute the patch document for the current in-memory state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSnapshot`] for instances that were never decoded
    /// from the service, or [`Error::DecodeError`] if the snapshot no longer
    /// decodes.
    fn patch_payload(&self) -> Result<Map<String, Value>> {
        let uri = &self.entity().odata_id;
        let raw = self
            .snapshot()
            .as_bytes()
            .ok_or_else(|| Error::MissingSnapshot(uri.clone()))?;

        let original: Self = serde_json::from_slice(raw)
            .map_err(|err| Error::DecodeError(format!("snapshot of `{uri}`: {err}")))?;

        diff(&original, self, Self::MUTABLE_FIELDS)
    }

    /// Write changed mutable fields back through `client`.
    ///
    /// No request is made when nothing changed. The snapshot is not refreshed;
    /// re-fetch the resource to obtain a new baseline. The stored `@odata.etag`
    /// is not refreshed either, so a second conditional update without a
    /// re-fetch sends the old etag and a service that enforces it answers with
    /// [`Error::Conflict`].
    ///
    /// # Errors
    ///
    /// Returns the snapshot error from [`patch_payload`](Self::patch_payload) or
    /// the transport error from the PATCH.
    async fn update_with(&self, client: &SharedClient) -> Result<()> {
        let payload = self.patch_payload()?;
        let entity = self.entity();
        let uri = entity.odata_id.as_str();

        if payload.is_empty() {
            debug!(uri, "no mutable field changed, skipping update");
            return Ok(());
        }

        debug!(uri, fields = payload.len(), "updating resource");
        let payload = Value::Object(payload);
        match &entity.etag {
            Some(etag) => client.patch_with_etag(uri, &payload, etag).await,
            None => client.patch(uri, &payload).await,
        }
    }

    /// Write changed mutable fields back through the client this resource was fetched with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unbound`] if the resource was never fetched, otherwise
    /// as [`update_with`](Self::update_with). Call
    /// [`refresh`](crate::entity::refresh) between updates to pick up the new
    /// etag.
    async fn update(&self) -> Result<()> {
        let client = Arc::clone(self.entity().client()?);
        self.update_with(&client).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MockResourceClient, Response};
    use crate::entity::{fetch, Entity};
    use crate::testing::{Account, Settings};
    use mockall::predicate::{always, eq};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const ACCOUNT: &str = "/redfish/v1/AccountService/Accounts/1";

    fn account_body() -> Value {
        json!({
            "@odata.id": ACCOUNT,
            "Id": "1",
            "Enabled": true,
            "Timeout": 30,
            "Locked": false,
            "Settings": {"Theme": "dark", "Retries": 3}
        })
    }

    fn client_with_get(mut mock: MockResourceClient) -> SharedClient {
        mock.expect_get()
            .with(eq(ACCOUNT))
            .returning(|uri| Ok(Response::json(uri, &account_body())));
        Arc::new(mock)
    }

    #[tokio::test]
    async fn update_sends_only_changed_field() {
        let mut mock = MockResourceClient::new();
        mock.expect_patch()
            .with(eq(ACCOUNT), eq(json!({"Timeout": 60})))
            .times(1)
            .returning(|_, _| Ok(()));

        let client = client_with_get(mock);
        let mut account: Account = fetch(&client, ACCOUNT).await.unwrap();
        account.timeout = 60;
        account.update().await.unwrap();
    }

    #[tokio::test]
    async fn update_without_changes_is_a_no_op() {
        let mut mock = MockResourceClient::new();
        mock.expect_patch().never();
        mock.expect_patch_with_etag().never();

        let client = client_with_get(mock);
        let account: Account = fetch(&client, ACCOUNT).await.unwrap();
        account.update().await.unwrap();
    }

    #[tokio::test]
    async fn update_ignores_fields_outside_the_mutable_set() {
        let mut mock = MockResourceClient::new();
        mock.expect_patch().never();

        let client = client_with_get(mock);
        let mut account: Account = fetch(&client, ACCOUNT).await.unwrap();
        account.locked = true;
        account.update().await.unwrap();
    }

    #[tokio::test]
    async fn repeated_update_sends_identical_patch() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&sent);

        let mut mock = MockResourceClient::new();
        mock.expect_patch()
            .with(eq(ACCOUNT), always())
            .times(2)
            .returning(move |_, payload| {
                recorded.lock().unwrap().push(payload.clone());
                Ok(())
            });

        let client = client_with_get(mock);
        let mut account: Account = fetch(&client, ACCOUNT).await.unwrap();
        account.enabled = false;
        account.update().await.unwrap();
        account.enabled = false;
        account.update().await.unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], json!({"Enabled": false}));
        assert_eq!(sent[0], sent[1]);
    }

    #[tokio::test]
    async fn update_sends_nested_delta() {
        let mut mock = MockResourceClient::new();
        mock.expect_patch()
            .with(eq(ACCOUNT), eq(json!({"Settings": {"Retries": 5}})))
            .times(1)
            .returning(|_, _| Ok(()));

        let client = client_with_get(mock);
        let mut account: Account = fetch(&client, ACCOUNT).await.unwrap();
        account.settings = Settings {
            theme: "dark".to_string(),
            retries: 5,
        };
        account.update().await.unwrap();
    }

    #[tokio::test]
    async fn update_uses_etag_when_present() {
        let mut mock = MockResourceClient::new();
        mock.expect_get().returning(|uri| {
            Ok(Response::json(
                uri,
                &json!({"@odata.id": uri, "@odata.etag": "W/\"7\"", "Timeout": 30}),
            ))
        });
        mock.expect_patch().never();
        mock.expect_patch_with_etag()
            .with(eq(ACCOUNT), eq(json!({"Timeout": 45})), eq("W/\"7\""))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let client: SharedClient = Arc::new(mock);
        let mut account: Account = fetch(&client, ACCOUNT).await.unwrap();
        account.timeout = 45;
        account.update().await.unwrap();
    }

    #[tokio::test]
    async fn update_keeps_fetched_etag_until_refresh() {
        let mut mock = MockResourceClient::new();
        mock.expect_get().returning(|uri| {
            Ok(Response::json(
                uri,
                &json!({"@odata.id": uri, "@odata.etag": "W/\"7\"", "Timeout": 30}),
            ))
        });
        let calls = AtomicUsize::new(0);
        mock.expect_patch_with_etag()
            .with(eq(ACCOUNT), eq(json!({"Timeout": 45})), eq("W/\"7\""))
            .times(2)
            .returning(move |uri, _, _| {
                // The service has moved past the etag after the first write.
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Ok(())
                } else {
                    Err(Error::Conflict(uri.to_string()))
                }
            });

        let client: SharedClient = Arc::new(mock);
        let mut account: Account = fetch(&client, ACCOUNT).await.unwrap();
        account.timeout = 45;
        account.update().await.unwrap();

        assert_eq!(account.entity.etag.as_deref(), Some("W/\"7\""));
        let err = account.update().await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn update_surfaces_patch_error_without_retry() {
        let mut mock = MockResourceClient::new();
        mock.expect_patch()
            .times(1)
            .returning(|uri, _| Err(Error::InvalidRequest(uri.to_string())));

        let client = client_with_get(mock);
        let mut account: Account = fetch(&client, ACCOUNT).await.unwrap();
        account.timeout = 0;
        let err = account.update().await.unwrap_err();
        assert_eq!(err, Error::InvalidRequest(ACCOUNT.to_string()));
    }

    #[tokio::test]
    async fn update_with_uses_the_given_client() {
        let mut writer = MockResourceClient::new();
        writer
            .expect_patch()
            .with(eq(ACCOUNT), eq(json!({"Enabled": false})))
            .times(1)
            .returning(|_, _| Ok(()));
        let writer: SharedClient = Arc::new(writer);

        let reader = client_with_get(MockResourceClient::new());
        let mut account: Account = fetch(&reader, ACCOUNT).await.unwrap();
        account.enabled = false;
        account.update_with(&writer).await.unwrap();
    }

    #[test]
    fn patch_payload_requires_snapshot() {
        let account = Account {
            entity: Entity::new(ACCOUNT, "1"),
            ..Account::default()
        };
        let err = account.patch_payload().unwrap_err();
        assert_eq!(err, Error::MissingSnapshot(ACCOUNT.to_string()));
    }

    #[test]
    fn patch_payload_reports_corrupt_snapshot() {
        let mut account = Account {
            entity: Entity::new(ACCOUNT, "1"),
            ..Account::default()
        };
        account.snapshot.capture(b"{\"Timeout\": \"thirty\"}");
        let err = account.patch_payload().unwrap_err();
        assert!(matches!(err, Error::DecodeError(_)));
    }

    #[test]
    fn delta_handles_nested_objects() {
        let before = json!({"A": 1, "B": {"C": 2, "D": 3}, "E": 4});
        let after = json!({"A": 1, "B": {"C": 2, "D": 9}});
        assert_eq!(
            delta(&before, &after),
            Some(json!({"B": {"D": 9}, "E": null}))
        );
        assert_eq!(delta(&before, &before), None);
        assert_eq!(delta(&json!([1, 2]), &json!([1, 3])), Some(json!([1, 3])));
    }

    #[test]
    fn snapshot_debug_hides_content() {
        let mut snapshot = Snapshot::default();
        assert_eq!(format!("{snapshot:?}"), "Snapshot(empty)");
        snapshot.capture(b"{\"Password\":\"x\"}");
        assert_eq!(format!("{snapshot:?}"), "Snapshot(16 bytes)");
    }
}
