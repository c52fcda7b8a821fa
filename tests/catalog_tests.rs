mod helpers;

use helpers::create_task;
use reward_server::entities::task::TaskSummary;
use reward_server::middleware::error::ErrorResponseBody;
use rust_decimal_macros::dec;
use serde_json::Value;

test_with_server!(catalog_lists_newest_first, |server, ctx_state, config| {
    let first = create_task(&server, "10.00", 15).await;
    let second = create_task(&server, "3.33", 20).await;
    let third = create_task(&server, "0.05", 25).await;

    let response = server.get("/api/tasks").await;
    response.assert_status_ok();
    let tasks = response.json::<Vec<TaskSummary>>();

    let ids: Vec<_> = tasks.iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![third, second, first]);
    assert_eq!(tasks[0].reward, dec!(0.04));
    assert_eq!(tasks[1].reward, dec!(2.33));
    assert_eq!(tasks[2].reward, dec!(7.00));
    assert_eq!(tasks[2].duration_seconds, 15);
    assert_eq!(tasks[2].link, "https://example.com/ad");
});

test_with_server!(catalog_hides_full_price, |server, ctx_state, config| {
    create_task(&server, "10.00", 15).await;

    let tasks = server.get("/api/tasks").await.json::<Vec<Value>>();
    let entry = tasks[0].as_object().unwrap();
    let mut keys: Vec<_> = entry.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["id", "reward", "time", "title", "url"]);
    assert_eq!(entry["reward"].as_f64(), Some(7.0));
    assert_eq!(entry["time"].as_u64(), Some(15));
});

test_with_server!(catalog_respects_limit, |server, ctx_state, config| {
    for _ in 0..4 {
        create_task(&server, "1.00", 10).await;
    }

    let tasks = server
        .get("/api/tasks")
        .add_query_param("limit", 2)
        .await
        .json::<Vec<TaskSummary>>();
    assert_eq!(tasks.len(), 2);

    let tasks = server
        .get("/api/tasks")
        .add_query_param("limit", 0)
        .await
        .json::<Vec<TaskSummary>>();
    assert!(tasks.is_empty());
});

test_with_server!(catalog_skips_inactive_tasks, |server, ctx_state, config| {
    let active = create_task(&server, "1.00", 10).await;
    let retired = create_task(&server, "2.00", 10).await;
    ctx_state
        .db
        .client
        .query("UPDATE type::thing('task', $id) SET active = false RETURN NONE;")
        .bind(("id", retired.to_string()))
        .await
        .unwrap()
        .check()
        .unwrap();

    let tasks = server.get("/api/tasks").await.json::<Vec<TaskSummary>>();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, active);
});

test_with_server!(empty_catalog, |server, ctx_state, config| {
    let tasks = server.get("/api/tasks").await.json::<Vec<TaskSummary>>();
    assert!(tasks.is_empty());
});

test_with_server!(catalog_bad_limit_is_json_error, |server, ctx_state, config| {
    for limit in ["abc", "-1"] {
        let response = server.get("/api/tasks").add_query_param("limit", limit).await;
        response.assert_status_bad_request();
        let body = response.json::<ErrorResponseBody>();
        assert_eq!(body.status, "error");
    }
});
