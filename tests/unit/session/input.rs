use super::*;

#[test]
fn drain_preserves_arrival_order() {
    let q = InputQueue::new();
    q.push(InputEvent::SetProgress(0.1));
    q.push(InputEvent::SelectLocation(2));
    q.push(InputEvent::SetProgress(0.9));
    assert_eq!(
        q.drain(),
        vec![
            InputEvent::SetProgress(0.1),
            InputEvent::SelectLocation(2),
            InputEvent::SetProgress(0.9),
        ]
    );
    assert!(q.drain().is_empty());
}

#[test]
fn sender_works_across_threads() {
    let q = InputQueue::new();
    let tx = q.sender();
    std::thread::spawn(move || {
        assert!(tx.send(InputEvent::Zoom { delta: 1.0 }));
    })
    .join()
    .unwrap();
    assert_eq!(q.drain(), vec![InputEvent::Zoom { delta: 1.0 }]);
}

#[test]
fn sender_reports_dropped_queue() {
    let q = InputQueue::new();
    let tx = q.sender();
    drop(q);
    assert!(!tx.send(InputEvent::SetProgress(1.0)));
}
