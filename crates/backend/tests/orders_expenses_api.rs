mod common;

use common::{measurement_body, TestApp};
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_measurement_lifecycle() {
    let app = TestApp::spawn().await;
    let cookie = app.signup().await;
    let customer = app.create_customer(&cookie, "Hamza", "03111234567").await;
    let path = format!("/api/measurements/{}", customer["id"].as_str().unwrap());

    let mut incomplete = measurement_body();
    incomplete.as_object_mut().unwrap().remove("knee");
    let response = app.post(&cookie, &path, incomplete).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "All measurement fields are required");

    let response = app.post(&cookie, &path, measurement_body()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.post(&cookie, &path, measurement_body()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.put(&cookie, &path, json!({ "waist": 38 })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["waist"], 38.0);
    assert_eq!(updated["chest"], 42.0);

    let view: Value = app.get(&cookie, &path).await.json().await.unwrap();
    assert_eq!(view["customerDetails"]["customerId"], "01");

    let response = app.delete(&cookie, &path).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.delete(&cookie, &path).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_order_flow_and_sales() {
    let app = TestApp::spawn().await;
    let cookie = app.signup().await;
    let customer = app.create_customer(&cookie, "Zubair", "03211234567").await;
    let customer_id = customer["id"].as_str().unwrap();

    let response = app
        .post(&cookie, "/api/orders", json!({ "customer": customer_id }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Required fields missing");

    let mut ids = Vec::new();
    for amount in [100, 250] {
        let response = app
            .post(
                &cookie,
                "/api/orders",
                json!({
                    "customer": customer_id,
                    "suitType": "Shalwar Kameez",
                    "deliveryDate": "2030-06-01",
                    "totalAmount": amount
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let order: Value = response.json().await.unwrap();
        assert_eq!(order["status"], "pending");
        assert_eq!(order["quantity"], 1);
        ids.push(order["id"].as_str().unwrap().to_string());
    }

    let response = app
        .put(
            &cookie,
            &format!("/api/orders/{}/status", ids[0]),
            json!({ "status": "delivered" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .put(
            &cookie,
            &format!("/api/orders/{}/status", ids[0]),
            json!({ "status": "lost" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let order: Value = app
        .get(&cookie, &format!("/api/orders/{}", ids[0]))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(order["status"], "delivered");
    assert_eq!(order["customerDetails"]["name"], "Zubair");

    let today = chrono::Utc::now().date_naive();
    let sales: Value = app
        .get(
            &cookie,
            &format!("/api/orders/sales?from={}&to={}", today.pred_opt().unwrap(), today.succ_opt().unwrap()),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(sales, json!({ "totalAmount": 350.0, "totalOrders": 2 }));

    let sales: Value = app
        .get(&cookie, "/api/orders/sales?from=2000-01-01&to=2000-12-31")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(sales, json!({ "totalAmount": 0.0, "totalOrders": 0 }));

    let response = app
        .get(&cookie, "/api/orders/sales?from=2025-02-01&to=2025-01-01")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Orders survive their customer
    let response = app.delete(&cookie, &format!("/api/customers/{}", customer_id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let orders: Vec<Value> = app.get(&cookie, "/api/orders").await.json().await.unwrap();
    assert_eq!(orders.len(), 2);
    assert!(orders[0]["customerDetails"].is_null());
}

#[tokio::test]
async fn test_expense_total_and_duplicate_month() {
    let app = TestApp::spawn().await;
    let cookie = app.signup().await;

    let body = json!({ "month": "2025-01", "salaries": 1000, "rent": 500, "electricity": 200 });
    let response = app.post(&cookie, "/api/expenses", body.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let expense: Value = response.json().await.unwrap();
    assert_eq!(expense["totalAmount"], 1700.0);

    let response = app.post(&cookie, "/api/expenses", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["message"], "Expense record for 2025-01 already exists.");

    let id = expense["id"].as_str().unwrap();
    let response = app
        .put(&cookie, &format!("/api/expenses/{}", id), json!({ "rent": 800 }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["month"], "2025-01");
    assert_eq!(updated["totalAmount"], 800.0);

    let list: Vec<Value> = app.get(&cookie, "/api/expenses").await.json().await.unwrap();
    assert_eq!(list.len(), 1);
}
