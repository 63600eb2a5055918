//! Catalog operations: listing, provisioning and JSON transfer for the
//! managed deployment.

use crate::db::errors::{DbError, Result};
use crate::db::MongoHandle;
use crate::types::{CollectionName, DatabaseName};
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::results::CollectionType;
use serde_json::{json, Value};

/// Databases every deployment carries that are not user data.
const SYSTEM_DATABASES: [&str; 3] = ["admin", "config", "local"];

pub fn is_system_database(name: &str) -> bool {
    SYSTEM_DATABASES.contains(&name)
}

/// A user database as reported by the server.
#[derive(Debug, Clone)]
pub struct DatabaseInfo {
    pub name: String,
    pub size_on_disk: u64,
    pub empty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Collection,
    View,
}

#[derive(Debug, Clone)]
pub struct CollectionInfo {
    pub name: String,
    pub kind: CollectionKind,
}

/// Repository over the deployment's catalog: databases, collections and
/// their documents.
#[derive(Clone)]
pub struct Catalog {
    handle: MongoHandle,
}

impl Catalog {
    pub fn new(handle: MongoHandle) -> Self {
        Self { handle }
    }

    /// List user databases, system databases filtered out.
    pub async fn list_databases(&self) -> Result<Vec<DatabaseInfo>> {
        let client = self.handle.client().await?;
        let specs = client.list_databases().await?;

        Ok(specs
            .into_iter()
            .filter(|spec| !is_system_database(&spec.name))
            .map(|spec| DatabaseInfo {
                name: spec.name,
                size_on_disk: spec.size_on_disk,
                empty: spec.empty,
            })
            .collect())
    }

    pub async fn list_collections(&self, database: &DatabaseName) -> Result<Vec<CollectionInfo>> {
        let client = self.handle.client().await?;
        let mut cursor = client.database(database.as_str()).list_collections().await?;

        let mut collections = Vec::new();
        while let Some(spec) = cursor.try_next().await? {
            let kind = match spec.collection_type {
                CollectionType::View => CollectionKind::View,
                _ => CollectionKind::Collection,
            };
            collections.push(CollectionInfo { name: spec.name, kind });
        }
        Ok(collections)
    }

    /// Create a database by creating its initial collections. MongoDB
    /// materializes a database on first collection creation, so an empty
    /// request still gets one placeholder collection.
    pub async fn create_database(&self, database: &DatabaseName, collections: &[CollectionName]) -> Result<()> {
        let client = self.handle.client().await?;
        let db = client.database(database.as_str());

        if collections.is_empty() {
            db.create_collection("default_collection").await?;
        } else {
            for collection in collections {
                db.create_collection(collection.as_str()).await?;
            }
        }

        tracing::info!(database = %database, collections = collections.len(), "database created");
        Ok(())
    }

    pub async fn drop_database(&self, database: &DatabaseName) -> Result<()> {
        let client = self.handle.client().await?;
        client.database(database.as_str()).drop().await?;
        tracing::info!(database = %database, "database dropped");
        Ok(())
    }

    /// Export every document of a collection as relaxed Extended JSON. An
    /// empty collection exports as `{"empty": true}`.
    pub async fn export_collection(&self, database: &DatabaseName, collection: &CollectionName) -> Result<Value> {
        let client = self.handle.client().await?;
        let mut cursor = client
            .database(database.as_str())
            .collection::<Document>(collection.as_str())
            .find(doc! {})
            .await?;

        let mut documents = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            documents.push(document);
        }
        Ok(documents_to_json(documents))
    }

    /// Insert JSON documents into a collection. Accepts a single object or an
    /// array of objects; returns the number of inserted documents.
    pub async fn import_collection(&self, database: &DatabaseName, collection: &CollectionName, payload: Value) -> Result<u64> {
        let documents = json_to_documents(payload)?;
        let count = documents.len();

        let client = self.handle.client().await?;
        let result = client
            .database(database.as_str())
            .collection::<Document>(collection.as_str())
            .insert_many(documents)
            .await?;

        tracing::info!(
            database = %database,
            collection = %collection,
            requested = count,
            inserted = result.inserted_ids.len(),
            "documents imported"
        );
        Ok(result.inserted_ids.len() as u64)
    }
}

fn documents_to_json(documents: Vec<Document>) -> Value {
    if documents.is_empty() {
        return json!({ "empty": true });
    }
    Value::Array(
        documents
            .into_iter()
            .map(|document| Bson::Document(document).into_relaxed_extjson())
            .collect(),
    )
}

fn json_to_documents(payload: Value) -> Result<Vec<Document>> {
    let values = match payload {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => {
            return Err(DbError::InvalidDocument {
                message: "expected a JSON object or an array of objects".to_string(),
            });
        }
    };

    if values.is_empty() {
        return Err(DbError::InvalidDocument {
            message: "at least one document is required".to_string(),
        });
    }

    values
        .into_iter()
        .map(|value| {
            if !value.is_object() {
                return Err(DbError::InvalidDocument {
                    message: "each document must be a JSON object".to_string(),
                });
            }
            mongodb::bson::to_document(&value).map_err(|err| DbError::InvalidDocument {
                message: format!("document is not representable as BSON: {err}"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_databases_are_recognized() {
        assert!(is_system_database("admin"));
        assert!(is_system_database("config"));
        assert!(is_system_database("local"));
        assert!(!is_system_database("orders_db"));
        assert!(!is_system_database("Admin"));
    }

    #[test]
    fn empty_collection_exports_as_empty_marker() {
        assert_eq!(documents_to_json(Vec::new()), json!({ "empty": true }));
    }

    #[test]
    fn documents_export_as_a_json_array() {
        let documents = vec![doc! { "sku": "A-1", "qty": 3_i32 }, doc! { "sku": "B-2", "qty": 7_i32 }];
        let value = documents_to_json(documents);

        let items = value.as_array().expect("export should be an array");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["sku"], json!("A-1"));
        assert_eq!(items[1]["qty"], json!(7));
    }

    #[test]
    fn import_accepts_object_and_array_payloads() {
        let single = json_to_documents(json!({ "sku": "A-1" })).unwrap();
        assert_eq!(single.len(), 1);

        let many = json_to_documents(json!([{ "sku": "A-1" }, { "sku": "B-2" }])).unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(many[1].get_str("sku").unwrap(), "B-2");
    }

    #[test]
    fn import_rejects_non_document_payloads() {
        assert!(matches!(
            json_to_documents(json!("just a string")),
            Err(DbError::InvalidDocument { .. })
        ));
        assert!(matches!(json_to_documents(json!([])), Err(DbError::InvalidDocument { .. })));
        assert!(matches!(
            json_to_documents(json!([{ "ok": true }, 42])),
            Err(DbError::InvalidDocument { .. })
        ));
    }
}
