//! [`HttpStore`]: the REST implementation of the `store` persistence traits.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use store::models::{Document, DocumentSubmission, LeaveBalance, PendingFile};
use store::{
    EmployeeId, EmployeeStore, LeaveDelta, RecordTab, ReferenceData, ReferenceStore, StoreError,
    Values,
};

use crate::endpoints::{decode_data, error_message, id_string, Endpoints};
use crate::settings::ApiSettings;

#[derive(Serialize)]
struct SubmitDocuments<'a> {
    documents: &'a [DocumentSubmission],
}

#[derive(Serialize)]
struct UpdateLeave<'a> {
    leave_balances: &'a [LeaveDelta],
}

#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    endpoints: Endpoints,
}

impl HttpStore {
    pub fn new(settings: &ApiSettings) -> Result<Self, StoreError> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(std::time::Duration::from_secs(settings.timeout_secs));
        let client = builder
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Ok(Self {
            client,
            endpoints: Endpoints::new(&settings.base_url),
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Send a request and return the body of a 2xx response.
    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?
            .to_vec();
        if status.is_success() {
            return Ok(body);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound);
        }
        let message = error_message(&body);
        tracing::debug!(status = status.as_u16(), ?message, "request rejected");
        Err(StoreError::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn get<T: DeserializeOwned>(&self, url: String) -> Result<T, StoreError> {
        let body = self.send(self.client.get(url)).await?;
        decode_data(&body)
    }
}

impl EmployeeStore for HttpStore {
    async fn fetch_record(&self, employee_id: EmployeeId, tab: RecordTab) -> Result<Value, StoreError> {
        let record: Value = self.get(self.endpoints.record(employee_id, tab)).await?;
        Ok(match record {
            Value::Null => Value::Object(Values::new()),
            other => other,
        })
    }

    async fn update_record(
        &self,
        employee_id: EmployeeId,
        tab: RecordTab,
        values: &Values,
    ) -> Result<(), StoreError> {
        let url = self.endpoints.record(employee_id, tab);
        self.send(self.client.put(url).json(values)).await?;
        Ok(())
    }

    async fn fetch_documents(&self, employee_id: EmployeeId) -> Result<Vec<Document>, StoreError> {
        let documents: Option<Vec<Document>> = self.get(self.endpoints.documents(employee_id)).await?;
        Ok(documents.unwrap_or_default())
    }

    async fn upload_file(&self, file: &PendingFile) -> Result<String, StoreError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        let form = Form::new().part("file", part);
        let body = self
            .send(self.client.post(self.endpoints.upload()).multipart(form))
            .await?;
        let data: Value = decode_data(&body)?;
        ["file_id", "fileId", "id"]
            .iter()
            .find_map(|key| id_string(data.get(key)?))
            .ok_or_else(|| StoreError::Decode("upload response has no file id".to_string()))
    }

    async fn submit_documents(
        &self,
        employee_id: EmployeeId,
        documents: &[DocumentSubmission],
    ) -> Result<(), StoreError> {
        let url = self.endpoints.documents(employee_id);
        self.send(self.client.post(url).json(&SubmitDocuments { documents }))
            .await?;
        Ok(())
    }

    async fn delete_document(&self, document_id: u64, employee_id: EmployeeId) -> Result<(), StoreError> {
        let url = self.endpoints.document(employee_id, document_id);
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn fetch_leave_balances(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<LeaveBalance>, StoreError> {
        let rows: Option<Vec<LeaveBalance>> = self.get(self.endpoints.leave_balances(employee_id)).await?;
        Ok(rows.unwrap_or_default())
    }

    async fn update_leave_balances(
        &self,
        employee_id: EmployeeId,
        deltas: &[LeaveDelta],
    ) -> Result<(), StoreError> {
        let url = self.endpoints.leave_balances(employee_id);
        self.send(self.client.put(url).json(&UpdateLeave {
            leave_balances: deltas,
        }))
        .await?;
        Ok(())
    }

    async fn create_employee(&self, values: &Values) -> Result<EmployeeId, StoreError> {
        let body = self
            .send(self.client.post(self.endpoints.employees()).json(values))
            .await?;
        let data: Value = decode_data(&body)?;
        data.get("id")
            .and_then(|id| id_string(id)?.parse().ok())
            .ok_or_else(|| StoreError::Decode("create response has no employee id".to_string()))
    }
}

impl ReferenceStore for HttpStore {
    async fn fetch_reference_data(&self) -> Result<ReferenceData, StoreError> {
        Ok(ReferenceData {
            departments: self.get(self.endpoints.departments()).await?,
            designations: self.get(self.endpoints.designations()).await?,
            document_categories: self.get(self.endpoints.document_categories()).await?,
        })
    }
}
