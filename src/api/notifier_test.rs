//! Tests for ChangeNotifier pub/sub system.

use super::notifier::{ChangeNotifier, UpdateMessage};

fn task_done(task_id: &str) -> UpdateMessage {
    UpdateMessage::TaskDone {
        request_id: "req1".to_string(),
        task_id: task_id.to_string(),
    }
}

#[tokio::test]
async fn test_multiple_subscribers_receive_same_message() {
    let notifier = ChangeNotifier::new();
    let mut sub1 = notifier.subscribe();
    let mut sub2 = notifier.subscribe();

    let msg = UpdateMessage::RequestCreated {
        request_id: "req123".to_string(),
    };

    notifier.notify(msg.clone());

    assert_eq!(sub1.recv().await.unwrap(), msg);
    assert_eq!(sub2.recv().await.unwrap(), msg);
}

#[tokio::test]
async fn test_notify_with_no_subscribers_does_not_panic() {
    let notifier = ChangeNotifier::new();

    notifier.notify(UpdateMessage::DataCleared {
        removed_requests: 3,
    });
}

#[tokio::test]
async fn test_messages_use_type_and_data_envelope() {
    let msg = UpdateMessage::TasksAdded {
        request_id: "req1".to_string(),
        task_ids: vec!["t1".to_string(), "t2".to_string()],
    };

    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["type"], "TasksAdded");
    assert_eq!(json["data"]["request_id"], "req1");
    assert_eq!(json["data"]["task_ids"][1], "t2");

    let deserialized: UpdateMessage = serde_json::from_value(json).unwrap();
    assert_eq!(deserialized, msg);
}

#[tokio::test]
async fn test_subscriber_receives_multiple_messages_in_order() {
    let notifier = ChangeNotifier::new();
    let mut sub = notifier.subscribe();

    let msg1 = task_done("t1");
    let msg2 = UpdateMessage::TaskApproved {
        request_id: "req1".to_string(),
        task_id: "t1".to_string(),
    };
    let msg3 = UpdateMessage::RequestCompleted {
        request_id: "req1".to_string(),
    };

    notifier.notify(msg1.clone());
    notifier.notify(msg2.clone());
    notifier.notify(msg3.clone());

    assert_eq!(sub.recv().await.unwrap(), msg1);
    assert_eq!(sub.recv().await.unwrap(), msg2);
    assert_eq!(sub.recv().await.unwrap(), msg3);
}

#[tokio::test]
async fn test_late_subscriber_does_not_receive_old_messages() {
    let notifier = ChangeNotifier::new();

    notifier.notify(task_done("old"));

    let mut sub = notifier.subscribe();

    let new_msg = task_done("new");
    notifier.notify(new_msg.clone());

    assert_eq!(sub.recv().await.unwrap(), new_msg);
    assert!(sub.try_recv().is_err());
}
