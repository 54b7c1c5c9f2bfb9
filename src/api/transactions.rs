use anyhow::Result;

use super::ApiClient;
use crate::core::model::{Message, NewTransaction, Transaction, TransactionUpdate};

impl ApiClient {
    pub async fn create_transaction(&self, transaction: &NewTransaction) -> Result<Message> {
        self.post_ack("/api/trans", transaction).await
    }

    pub async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        self.get("/api/trans").await
    }

    pub async fn get_transaction(&self, id: &str) -> Result<Transaction> {
        self.get(&format!("/api/trans/{id}")).await
    }

    pub async fn update_transaction(
        &self,
        id: &str,
        update: &TransactionUpdate,
    ) -> Result<Message> {
        self.put_ack(&format!("/api/trans/{id}"), update).await
    }

    pub async fn delete_transaction(&self, id: &str) -> Result<Message> {
        self.delete(&format!("/api/trans/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::TransactionKind;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_create_transfer_transaction() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/trans"))
            .and(body_json(json!({
                "accountId": "a1",
                "toAccountId": "a2",
                "amount": 40.0,
                "type": "transfer",
                "category": "Savings",
                "date": "2024-04-02",
                "description": "Monthly"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "t1"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri()).unwrap().with_token("t");
        client
            .create_transaction(&NewTransaction {
                account_id: "a1".to_string(),
                to_account_id: Some("a2".to_string()),
                amount: 40.0,
                kind: TransactionKind::Transfer,
                category: "Savings".to_string(),
                date: "2024-04-02".to_string(),
                description: Some("Monthly".to_string()),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_and_get_transactions() {
        let mock_server = MockServer::start().await;
        let tx = json!({
            "_id": "t1",
            "accountId": {"_id": "a1", "name": "Wallet", "currency": "EUR"},
            "amount": 12.5,
            "type": "income",
            "category": "Refund",
            "date": "2024-04-02T00:00:00.000Z"
        });
        Mock::given(method("GET"))
            .and(path("/api/trans"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([tx.clone()])))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/trans/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tx))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri()).unwrap().with_token("t");
        let all = client.list_transactions().await.unwrap();
        assert_eq!(all.len(), 1);
        let one = client.get_transaction("t1").await.unwrap();
        assert_eq!(one, all[0]);
        assert_eq!(one.currency(), "EUR");
    }

    #[tokio::test]
    async fn test_update_and_delete_transaction() {
        let mock_server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/trans/t1"))
            .and(body_json(json!({"amount": 8.0, "category": "Snacks"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "t1"})))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/trans/t1"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Transaction not found"
            })))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri()).unwrap().with_token("t");
        let update = TransactionUpdate {
            amount: Some(8.0),
            category: Some("Snacks".to_string()),
            ..Default::default()
        };
        client.update_transaction("t1", &update).await.unwrap();

        let err = client.delete_transaction("t1").await.unwrap_err();
        assert_eq!(err.to_string(), "Transaction not found");
    }
}
