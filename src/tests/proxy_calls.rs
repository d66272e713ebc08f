// Lean data and consent pass-through: request shape on the wire, the shared
// api token, and local validation that happens before any vendor traffic.

#[cfg(test)]
mod test {

    use std::sync::Arc;

    use axum::http::StatusCode;
    use chrono::{Duration, NaiveDate, Utc};
    use serde_json::json;

    use crate::error::BridgeError;
    use crate::sources::lean::LeanClient;
    use crate::sources::lean_types::{BalancesQuery, TransactionsQuery};
    use crate::tests::common::{
        build_reqwest_client, service_config, spawn_vendor_mock, token_responder, token_url, url, RecordedRequest,
        Responder, UNUSED_URL,
    };

    fn echo_ok() -> Responder {
        Arc::new(|req: &RecordedRequest, _: usize| (StatusCode::OK, json!({ "path": req.path, "status": "OK" })))
    }

    #[tokio::test]
    async fn balances_forwards_timestamp_verbatim() {
        let (auth_handle, auth_addr, _) = spawn_vendor_mock(token_responder(3600)).await;
        let (api_handle, api_addr, api) = spawn_vendor_mock(echo_ok()).await;
        let cfg = service_config(&token_url(auth_addr), &url(api_addr), &url(api_addr), None);
        let lean = LeanClient::new(build_reqwest_client(), &cfg.lean);

        let data = lean
            .get_balances(&BalancesQuery {
                entity_id: "ent-1".into(),
                account_ids: Some(vec!["acc-1".into(), "acc-2".into()]),
                min_last_updated_datetime: Some("2026-10-01T08:30:00+04:00".into()),
            })
            .await
            .unwrap();

        assert_eq!(data["path"], "/data/v2/balances");
        let calls = api.calls();
        let call = &calls[0];
        assert_eq!(call.method, "POST");
        assert_eq!(call.authorization.as_deref(), Some("Bearer tok-api-0"));
        assert_eq!(
            call.json(),
            json!({
                "entity_id": "ent-1",
                "account_ids": ["acc-1", "acc-2"],
                "options": { "min_last_updated_datetime": "2026-10-01T08:30:00+04:00" }
            })
        );

        auth_handle.abort();
        api_handle.abort();
    }

    #[tokio::test]
    async fn balances_rejects_bad_timestamp_locally() {
        let (auth_handle, auth_addr, tokens) = spawn_vendor_mock(token_responder(3600)).await;
        let (api_handle, api_addr, api) = spawn_vendor_mock(echo_ok()).await;
        let cfg = service_config(&token_url(auth_addr), &url(api_addr), &url(api_addr), None);
        let lean = LeanClient::new(build_reqwest_client(), &cfg.lean);

        let err = lean
            .get_balances(&BalancesQuery {
                entity_id: "ent-1".into(),
                account_ids: None,
                min_last_updated_datetime: Some("yesterday".into()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::Validation(_)));
        assert_eq!(tokens.len(), 0);
        assert_eq!(api.len(), 0);

        auth_handle.abort();
        api_handle.abort();
    }

    #[tokio::test]
    async fn transactions_default_to_trailing_window() {
        let (auth_handle, auth_addr, _) = spawn_vendor_mock(token_responder(3600)).await;
        let (api_handle, api_addr, api) = spawn_vendor_mock(echo_ok()).await;
        let cfg = service_config(&token_url(auth_addr), &url(api_addr), &url(api_addr), None);
        let lean = LeanClient::new(build_reqwest_client(), &cfg.lean);

        lean.get_transactions(&TransactionsQuery {
            entity_id: "ent-1".into(),
            account_id: "acc-1".into(),
            from_date: None,
            to_date: None,
        })
        .await
        .unwrap();

        let body = api.calls()[0].json();
        let today = Utc::now().date_naive();
        assert_eq!(body["to_date"], today.to_string());
        assert_eq!(body["from_date"], (today - Duration::days(30)).to_string());
        assert_eq!(body["account_id"], "acc-1");

        auth_handle.abort();
        api_handle.abort();
    }

    #[tokio::test]
    async fn transactions_reject_inverted_range() {
        let (auth_handle, auth_addr, tokens) = spawn_vendor_mock(token_responder(3600)).await;
        let cfg = service_config(&token_url(auth_addr), UNUSED_URL, UNUSED_URL, None);
        let lean = LeanClient::new(build_reqwest_client(), &cfg.lean);

        let err = lean
            .get_transactions(&TransactionsQuery {
                entity_id: "ent-1".into(),
                account_id: "acc-1".into(),
                from_date: NaiveDate::from_ymd_opt(2026, 5, 1),
                to_date: NaiveDate::from_ymd_opt(2026, 4, 1),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::Validation(_)));
        assert_eq!(tokens.len(), 0);

        auth_handle.abort();
    }

    #[tokio::test]
    async fn transactions_reject_end_date_without_room_for_window() {
        let (auth_handle, auth_addr, tokens) = spawn_vendor_mock(token_responder(3600)).await;
        let cfg = service_config(&token_url(auth_addr), UNUSED_URL, UNUSED_URL, None);
        let lean = LeanClient::new(build_reqwest_client(), &cfg.lean);
        let query: TransactionsQuery = serde_json::from_value(json!({
            "entity_id": "ent-1",
            "account_id": "acc-1",
            "to_date": "-262143-01-01"
        }))
        .unwrap();

        let err = lean.get_transactions(&query).await.unwrap_err();

        assert!(matches!(err, BridgeError::Validation(_)));
        assert_eq!(tokens.len(), 0);

        auth_handle.abort();
    }

    #[tokio::test]
    async fn data_calls_share_one_api_token() {
        let (auth_handle, auth_addr, tokens) = spawn_vendor_mock(token_responder(3600)).await;
        let (api_handle, api_addr, api) = spawn_vendor_mock(echo_ok()).await;
        let cfg = service_config(&token_url(auth_addr), &url(api_addr), &url(api_addr), None);
        let lean = LeanClient::new(build_reqwest_client(), &cfg.lean);

        lean.list_accounts("ent-1").await.unwrap();
        lean.list_consents("cust-1", "ent-1").await.unwrap();
        lean.list_accounts("ent-2").await.unwrap();

        assert_eq!(tokens.len(), 1);
        let calls = api.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|c| c.authorization.as_deref() == Some("Bearer tok-api-0")));
        assert_eq!(calls[0].path, "/data/v2/accounts");
        assert_eq!(calls[0].query.as_deref(), Some("entity_id=ent-1"));
        assert_eq!(calls[1].path, "/customers/v1/cust-1/entities/ent-1/consents");

        auth_handle.abort();
        api_handle.abort();
    }

    #[tokio::test]
    async fn deleting_unknown_consent_relays_vendor_status() {
        let (auth_handle, auth_addr, _) = spawn_vendor_mock(token_responder(3600)).await;
        let responder: Responder = Arc::new(|_: &RecordedRequest, _: usize| {
            (StatusCode::NOT_FOUND, json!({ "status": "CONSENT_NOT_FOUND" }))
        });
        let (api_handle, api_addr, api) = spawn_vendor_mock(responder).await;
        let cfg = service_config(&token_url(auth_addr), &url(api_addr), &url(api_addr), None);
        let lean = LeanClient::new(build_reqwest_client(), &cfg.lean);

        let err = lean.delete_consent("cust-1", "ent-1", "missing", None).await.unwrap_err();

        match err {
            BridgeError::Vendor { vendor, status, body } => {
                assert_eq!(vendor, "lean");
                assert_eq!(status, 404);
                assert_eq!(body["status"], "CONSENT_NOT_FOUND");
            }
            other => panic!("expected vendor failure, got {other:?}"),
        }
        let calls = api.calls();
        let call = &calls[0];
        assert_eq!(call.method, "DELETE");
        assert_eq!(call.path, "/customers/v1/cust-1/entities/ent-1/consents/missing");
        assert_eq!(call.json(), json!({ "reason": "USER_REQUESTED" }));

        auth_handle.abort();
        api_handle.abort();
    }
}
