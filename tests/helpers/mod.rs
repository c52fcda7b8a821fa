pub mod fakes;
pub mod test_with_server;

use axum_test::TestServer;
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use reward_server::entities::task::TaskId;
use reward_server::routes::admin::CreatedTaskResponse;
use serde_json::json;

pub const ADMIN_PASSWORD: &str = "admin-secret";

// used from several test binaries, not all of them call every helper
#[allow(dead_code)]
pub async fn create_task(server: &TestServer, price: &str, seconds: u32) -> TaskId {
    let title: String = Sentence(2..5).fake();
    let response = server
        .post("/admin/tasks")
        .form(&json!({
            "title": title,
            "url": "https://example.com/ad",
            "price": price,
            "seconds": seconds,
            "password": ADMIN_PASSWORD,
        }))
        .await;
    response.assert_status_ok();
    response.json::<CreatedTaskResponse>().id
}

#[allow(dead_code)]
pub fn fake_user_id() -> String {
    (100_000_000u64..999_999_999u64).fake::<u64>().to_string()
}
