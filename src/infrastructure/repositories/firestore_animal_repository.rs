use super::animal_repository::{AnimalRepository, PersistenceError};
use crate::domain::animal::{Animal, FieldKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const COLLECTION: &str = "animals";
const PAGE_SIZE: u32 = 300;

/// Firestore REST implementation of the animal repository.
///
/// Documents are read with list pagination and written with `updateMask`
/// merge patches, so fields this batch does not produce are never touched.
pub struct FirestoreAnimalRepository {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Document {
    /// Full resource path; the document id is its last segment
    name: String,
    #[serde(default)]
    fields: BTreeMap<String, TypedValue>,
}

/// Firestore typed value wrapper. Only string fields are narratable;
/// any other value type deserializes with `string_value: None` and is ignored.
#[derive(Debug, Serialize, Deserialize)]
struct TypedValue {
    #[serde(rename = "stringValue", skip_serializing_if = "Option::is_none")]
    string_value: Option<String>,
}

#[derive(Debug, Serialize)]
struct PatchBody {
    fields: BTreeMap<String, TypedValue>,
}

impl FirestoreAnimalRepository {
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        project_id: String,
        access_token: String,
    ) -> Self {
        Self {
            client,
            base_url,
            project_id,
            access_token,
        }
    }

    fn collection_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            self.base_url, self.project_id, COLLECTION
        )
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    fn to_animal(document: Document) -> Result<Animal, PersistenceError> {
        let id = document
            .name
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| {
                PersistenceError::Malformed(format!("document has no id: {}", document.name))
            })?
            .to_string();

        let name = document
            .fields
            .get("name")
            .and_then(|v| v.string_value.clone())
            .unwrap_or_default();

        let mut animal = Animal::new(id, name);
        for kind in FieldKind::ALL {
            if let Some(text) = document
                .fields
                .get(&kind.text_field())
                .and_then(|v| v.string_value.clone())
            {
                animal.texts.insert(kind, text);
            }
        }

        Ok(animal)
    }
}

#[async_trait]
impl AnimalRepository for FirestoreAnimalRepository {
    async fn list_animals(&self) -> Result<Vec<Animal>, PersistenceError> {
        let mut animals = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(self.collection_url())
                .bearer_auth(&self.access_token)
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(PersistenceError::Store {
                    status: status.as_u16(),
                    body,
                });
            }

            let page: ListDocumentsResponse = response
                .json()
                .await
                .map_err(|e| PersistenceError::Malformed(e.to_string()))?;

            for document in page.documents {
                animals.push(Self::to_animal(document)?);
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::info!(count = animals.len(), "Fetched animals from Firestore");

        Ok(animals)
    }

    async fn update_audio_urls(
        &self,
        id: &str,
        urls: &BTreeMap<FieldKind, String>,
    ) -> Result<(), PersistenceError> {
        debug_assert!(!urls.is_empty(), "update_audio_urls requires fields");

        let mut fields = BTreeMap::new();
        let mut mask: Vec<(&str, String)> = Vec::new();
        for (kind, url) in urls {
            let field = kind.url_field();
            mask.push(("updateMask.fieldPaths", field.clone()));
            fields.insert(
                field,
                TypedValue {
                    string_value: Some(url.clone()),
                },
            );
        }

        tracing::info!(
            animal_id = %id,
            fields = ?fields.keys().collect::<Vec<_>>(),
            "Patching audio URLs onto Firestore document"
        );

        let response = self
            .client
            .patch(self.document_url(id))
            .bearer_auth(&self.access_token)
            .query(&mask)
            .json(&PatchBody { fields })
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(PersistenceError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PersistenceError::Store {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::animal::{Category, Language};
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DESC_EN: FieldKind = FieldKind {
        category: Category::Description,
        language: Language::English,
    };
    const DESC_ID: FieldKind = FieldKind {
        category: Category::Description,
        language: Language::Indonesian,
    };

    fn test_repository(server: &MockServer) -> FirestoreAnimalRepository {
        FirestoreAnimalRepository::new(
            reqwest::Client::new(),
            server.uri(),
            "fauna-test".to_string(),
            "firestore-token".to_string(),
        )
    }

    fn document(id: &str, fields: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "name": format!(
                "projects/fauna-test/databases/(default)/documents/animals/{id}"
            ),
            "fields": fields
        })
    }

    #[tokio::test]
    async fn test_list_animals_maps_recognized_fields() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/projects/fauna-test/databases/(default)/documents/animals"))
            .and(header("authorization", "Bearer firestore-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "documents": [document("a1", serde_json::json!({
                    "name": {"stringValue": "Tiger"},
                    "description_en": {"stringValue": "A large cat."},
                    "description_id": {"stringValue": "Kucing besar."},
                    "weight_kg": {"integerValue": "220"},
                    "unrelated": {"booleanValue": true}
                }))]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let animals = test_repository(&server).list_animals().await.unwrap();

        assert_eq!(animals.len(), 1);
        let tiger = &animals[0];
        assert_eq!(tiger.id, "a1");
        assert_eq!(tiger.name, "Tiger");
        assert_eq!(tiger.texts.get(&DESC_EN).unwrap(), "A large cat.");
        assert_eq!(tiger.texts.get(&DESC_ID).unwrap(), "Kucing besar.");
        // Non-string and unrecognized fields are dropped
        assert_eq!(tiger.texts.len(), 2);
    }

    #[tokio::test]
    async fn test_list_animals_follows_pagination() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/projects/fauna-test/databases/(default)/documents/animals"))
            .and(query_param("pageToken", "page2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "documents": [document("a2", serde_json::json!({
                    "name": {"stringValue": "Komodo"}
                }))]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/projects/fauna-test/databases/(default)/documents/animals"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "documents": [document("a1", serde_json::json!({
                    "name": {"stringValue": "Tiger"}
                }))],
                "nextPageToken": "page2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let animals = test_repository(&server).list_animals().await.unwrap();

        let ids: Vec<&str> = animals.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2"]);
    }

    #[tokio::test]
    async fn test_list_animals_empty_collection() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let animals = test_repository(&server).list_animals().await.unwrap();
        assert!(animals.is_empty());
    }

    #[tokio::test]
    async fn test_list_animals_propagates_store_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("permission denied"))
            .mount(&server)
            .await;

        let err = test_repository(&server).list_animals().await.unwrap_err();
        assert!(matches!(err, PersistenceError::Store { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_update_audio_urls_sends_merge_patch() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path(
                "/projects/fauna-test/databases/(default)/documents/animals/a1",
            ))
            .and(header("authorization", "Bearer firestore-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "projects/fauna-test/databases/(default)/documents/animals/a1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut urls = BTreeMap::new();
        urls.insert(DESC_EN, "https://example.test/a1_en.mp3".to_string());
        urls.insert(DESC_ID, "https://example.test/a1_id.mp3".to_string());

        test_repository(&server)
            .update_audio_urls("a1", &urls)
            .await
            .unwrap();

        let request = &server.received_requests().await.unwrap()[0];

        // One updateMask entry per written field, so the write stays a merge
        let mask: Vec<String> = request
            .url
            .query_pairs()
            .filter(|(k, _)| k == "updateMask.fieldPaths")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(mask, vec!["audio_url_en", "audio_url_id"]);

        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "fields": {
                    "audio_url_en": {"stringValue": "https://example.test/a1_en.mp3"},
                    "audio_url_id": {"stringValue": "https://example.test/a1_id.mp3"}
                }
            })
        );
    }

    #[tokio::test]
    async fn test_update_audio_urls_missing_document() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let mut urls = BTreeMap::new();
        urls.insert(DESC_EN, "https://example.test/x.mp3".to_string());

        let err = test_repository(&server)
            .update_audio_urls("ghost", &urls)
            .await
            .unwrap_err();

        assert!(matches!(err, PersistenceError::NotFound(id) if id == "ghost"));
    }
}
