//! View model flows driven with scripted responses.
//!
//! Each test plays the host: it takes the `Dispatch`es the view model hands
//! out, checks the request, and completes them with a canned `HttpResponse`
//! (or a transport failure) in whatever order the scenario needs.

use std::cell::RefCell;
use std::rc::Rc;

use todo_core::{
    Command, Dispatch, HttpMethod, HttpResponse, Notice, Rendered, TodoClient, TodoId, TodoStore,
    TransportError, UiEvent, ViewModel,
};

type Renders = Rc<RefCell<Vec<Rendered>>>;

fn view_model() -> (ViewModel, Renders, Dispatch) {
    let renders: Renders = Rc::new(RefCell::new(Vec::new()));
    let mut vm = ViewModel::new(TodoClient::new("http://localhost:3000"), TodoStore::new());
    let sink = Rc::clone(&renders);
    let mut reaction = vm.bootstrap(move |r| sink.borrow_mut().push(r.clone()));
    assert_eq!(reaction.dispatch.len(), 1);
    (vm, renders, reaction.dispatch.remove(0))
}

/// Bootstrapped view model holding `[{1,"A",false},{2,"B",true}]`.
fn seeded() -> (ViewModel, Renders) {
    let (mut vm, renders, fetch) = view_model();
    vm.complete(
        fetch.ticket,
        Ok(HttpResponse::new(
            200,
            r#"[{"id":1,"title":"A","completed":false},{"id":2,"title":"B","completed":true}]"#,
        )),
    );
    (vm, renders)
}

fn click(command: Command, id: u64) -> UiEvent {
    UiEvent::Click {
        command,
        id: TodoId::Number(id),
        input: None,
    }
}

fn single(mut dispatch: Vec<Dispatch>) -> Dispatch {
    assert_eq!(dispatch.len(), 1, "expected exactly one request");
    dispatch.remove(0)
}

fn body(dispatch: &Dispatch) -> serde_json::Value {
    serde_json::from_str(dispatch.request.body.as_deref().unwrap()).unwrap()
}

fn ids(vm: &ViewModel) -> Vec<u64> {
    vm.todos()
        .iter()
        .map(|t| match t.id {
            TodoId::Number(n) => n,
            ref other => panic!("unexpected text id {other}"),
        })
        .collect()
}

#[test]
fn bootstrap_renders_placeholder_and_fetches() {
    let (vm, renders, fetch) = view_model();
    assert_eq!(fetch.request.method, HttpMethod::Get);
    assert_eq!(fetch.request.path, "http://localhost:3000/todos");
    assert_eq!(renders.borrow().len(), 1);
    assert!(renders.borrow()[0].incomplete.contains("no task to display"));
    assert_eq!(vm.store().subscriber_count(), 1);
    assert_eq!(vm.in_flight(), 1);
}

#[test]
fn fetch_populates_and_partitions() {
    let (vm, renders) = seeded();
    assert_eq!(ids(&vm), vec![1, 2]);
    let last = renders.borrow().last().cloned().unwrap();
    assert!(last.incomplete.contains(r#"data-id="1""#));
    assert!(!last.incomplete.contains(r#"data-id="2""#));
    assert!(last.complete.contains(r#"data-id="2""#));
    assert!(!last.complete.contains(r#"data-id="1""#));
}

#[test]
fn fetch_failure_is_logged() {
    let (mut vm, _renders, fetch) = view_model();
    let reaction = vm.complete(fetch.ticket, Err(TransportError("connection refused".into())));
    assert!(matches!(reaction.notice, Some(Notice::Log(ref m)) if m.contains("connection refused")));
    assert!(vm.todos().is_empty());
}

#[test]
fn add_prepends_created_item() {
    let (mut vm, renders) = seeded();
    let reaction = vm.handle(UiEvent::Submit { title: "C".into() });
    let create = single(reaction.dispatch);
    assert_eq!(create.request.method, HttpMethod::Post);
    assert_eq!(body(&create), serde_json::json!({"title": "C", "completed": false}));
    assert_eq!(ids(&vm), vec![1, 2], "nothing changes before the server answers");

    let before = renders.borrow().len();
    let reaction = vm.complete(
        create.ticket,
        Ok(HttpResponse::new(201, r#"{"id":3,"title":"C","completed":false}"#)),
    );
    assert!(reaction.clear_input);
    assert!(reaction.notice.is_none());
    assert_eq!(ids(&vm), vec![3, 1, 2]);
    assert!(!vm.todos()[0].completed);
    assert_eq!(renders.borrow().len(), before + 1);
}

#[test]
fn blank_title_is_rejected_without_request() {
    let (mut vm, renders) = seeded();
    let before = renders.borrow().len();
    for title in ["", "   ", "\t\n"] {
        let reaction = vm.handle(UiEvent::Submit { title: title.into() });
        assert!(reaction.dispatch.is_empty());
        assert_eq!(reaction.notice, Some(Notice::Alert("please input title!".into())));
        assert!(!reaction.clear_input);
    }
    assert_eq!(ids(&vm), vec![1, 2]);
    assert_eq!(vm.in_flight(), 0);
    assert_eq!(renders.borrow().len(), before);
}

#[test]
fn add_failure_alerts_and_keeps_state() {
    let (mut vm, _renders) = seeded();
    let create = single(vm.handle(UiEvent::Submit { title: "C".into() }).dispatch);
    let reaction = vm.complete(create.ticket, Ok(HttpResponse::new(500, "boom")));
    match reaction.notice {
        Some(Notice::Alert(message)) => assert!(message.starts_with("add new task failed: ")),
        other => panic!("expected alert, got {other:?}"),
    }
    assert!(!reaction.clear_input);
    assert_eq!(ids(&vm), vec![1, 2]);
}

#[test]
fn remove_drops_only_that_id() {
    let (mut vm, _renders) = seeded();
    let remove = single(vm.handle(click(Command::Delete, 1)).dispatch);
    assert_eq!(remove.request.method, HttpMethod::Delete);
    assert_eq!(remove.request.path, "http://localhost:3000/todos/1");
    vm.complete(remove.ticket, Ok(HttpResponse::new(200, "{}")));
    assert_eq!(ids(&vm), vec![2]);
}

#[test]
fn remove_from_middle_keeps_order_of_others() {
    let (mut vm, _renders) = seeded();
    let create = single(vm.handle(UiEvent::Submit { title: "C".into() }).dispatch);
    vm.complete(
        create.ticket,
        Ok(HttpResponse::new(201, r#"{"id":3,"title":"C","completed":false}"#)),
    );
    let remove = single(vm.handle(click(Command::Delete, 1)).dispatch);
    vm.complete(remove.ticket, Ok(HttpResponse::new(200, "{}")));
    assert_eq!(ids(&vm), vec![3, 2]);
}

#[test]
fn remove_failure_alerts() {
    let (mut vm, _renders) = seeded();
    let remove = single(vm.handle(click(Command::Delete, 2)).dispatch);
    let reaction = vm.complete(remove.ticket, Err(TransportError("offline".into())));
    assert_eq!(
        reaction.notice,
        Some(Notice::Alert("delete todo failed: network error: offline".into()))
    );
    assert_eq!(ids(&vm), vec![1, 2]);
}

#[test]
fn toggle_flips_only_completed() {
    let (mut vm, _renders) = seeded();
    let before = vm.todos().to_vec();
    let update = single(vm.handle(click(Command::Toggle, 1)).dispatch);
    assert_eq!(update.request.method, HttpMethod::Put);
    assert_eq!(update.request.path, "http://localhost:3000/todos/1");
    assert_eq!(body(&update), serde_json::json!({"title": "A", "completed": true}));

    vm.complete(update.ticket, Ok(HttpResponse::new(200, "")));
    let after = vm.todos();
    assert!(after[0].completed);
    assert_eq!(after[0].title, before[0].title);
    assert!(!after[0].editable);
    assert_eq!(after[1], before[1]);
}

#[test]
fn toggle_failure_is_logged_not_alerted() {
    let (mut vm, _renders) = seeded();
    let update = single(vm.handle(click(Command::Toggle, 2)).dispatch);
    let reaction = vm.complete(update.ticket, Ok(HttpResponse::new(503, "busy")));
    assert!(matches!(reaction.notice, Some(Notice::Log(_))));
    assert!(vm.todos()[1].completed);
}

#[test]
fn edit_enters_editing_without_request() {
    let (mut vm, renders) = seeded();
    let reaction = vm.handle(click(Command::Edit, 1));
    assert!(reaction.dispatch.is_empty());
    assert_eq!(vm.in_flight(), 0);
    assert!(vm.todos()[0].editable);
    assert!(!vm.todos()[1].editable);
    let last = renders.borrow().last().cloned().unwrap();
    assert!(last.incomplete.contains(r#"<input type="text" data-id="1" value="A">"#));
}

#[test]
fn submit_replaces_title_and_preserves_completed() {
    let (mut vm, _renders) = seeded();
    vm.handle(click(Command::Edit, 2));
    let update = single(
        vm.handle(UiEvent::Click {
            command: Command::Submit,
            id: TodoId::Number(2),
            input: Some("B2".into()),
        })
        .dispatch,
    );
    assert_eq!(body(&update), serde_json::json!({"title": "B2", "completed": true}));
    assert!(vm.todos()[1].editable, "stays editing until the server answers");

    vm.complete(update.ticket, Ok(HttpResponse::new(200, "")));
    let edited = &vm.todos()[1];
    assert_eq!(edited.title, "B2");
    assert!(edited.completed);
    assert!(!edited.editable);
    assert_eq!(vm.todos()[0].title, "A");
}

#[test]
fn failed_submit_keeps_item_editing() {
    let (mut vm, _renders) = seeded();
    vm.handle(click(Command::Edit, 1));
    let update = single(
        vm.handle(UiEvent::Click {
            command: Command::Submit,
            id: TodoId::Number(1),
            input: Some("changed".into()),
        })
        .dispatch,
    );
    let reaction = vm.complete(update.ticket, Err(TransportError("timeout".into())));
    assert_eq!(
        reaction.notice,
        Some(Notice::Log("edit todo failed: network error: timeout".into()))
    );
    assert!(vm.todos()[0].editable);
    assert_eq!(vm.todos()[0].title, "A");
}

#[test]
fn commands_that_do_not_match_the_mode_are_ignored() {
    let (mut vm, _renders) = seeded();
    assert!(vm.handle(click(Command::Submit, 1)).dispatch.is_empty());
    vm.handle(click(Command::Edit, 1));
    assert!(vm.handle(click(Command::Edit, 1)).dispatch.is_empty());
    assert!(vm.handle(click(Command::Toggle, 1)).dispatch.is_empty());
    assert!(vm.todos()[0].editable);
    assert_eq!(vm.in_flight(), 0);
}

#[test]
fn click_on_unknown_id_is_ignored() {
    let (mut vm, _renders) = seeded();
    let reaction = vm.handle(click(Command::Delete, 99));
    assert!(reaction.dispatch.is_empty());
    assert!(reaction.notice.is_none());
}

#[test]
fn older_update_resolving_last_is_dropped() {
    let (mut vm, _renders) = seeded();
    vm.handle(click(Command::Edit, 1));
    let first = single(
        vm.handle(UiEvent::Click {
            command: Command::Submit,
            id: TodoId::Number(1),
            input: Some("first".into()),
        })
        .dispatch,
    );
    let second = single(
        vm.handle(UiEvent::Click {
            command: Command::Submit,
            id: TodoId::Number(1),
            input: Some("second".into()),
        })
        .dispatch,
    );

    vm.complete(second.ticket, Ok(HttpResponse::new(200, "")));
    vm.complete(first.ticket, Ok(HttpResponse::new(200, "")));

    assert_eq!(vm.todos()[0].title, "second");
    assert_eq!(vm.in_flight(), 0);
}

#[test]
fn update_for_removed_item_does_not_resurrect_it() {
    let (mut vm, _renders) = seeded();
    let update = single(vm.handle(click(Command::Toggle, 1)).dispatch);
    let remove = single(vm.handle(click(Command::Delete, 1)).dispatch);
    vm.complete(remove.ticket, Ok(HttpResponse::new(200, "{}")));
    vm.complete(update.ticket, Ok(HttpResponse::new(200, "")));
    assert_eq!(ids(&vm), vec![2]);
}

#[test]
fn completing_a_ticket_twice_is_a_no_op() {
    let (mut vm, _renders) = seeded();
    let remove = single(vm.handle(click(Command::Delete, 1)).dispatch);
    vm.complete(remove.ticket, Ok(HttpResponse::new(200, "{}")));
    let reaction = vm.complete(remove.ticket, Ok(HttpResponse::new(500, "")));
    assert!(reaction.notice.is_none());
    assert_eq!(ids(&vm), vec![2]);
}

#[test]
fn text_ids_survive_fetch_and_remove() {
    let (mut vm, renders, fetch) = view_model();
    vm.complete(
        fetch.ticket,
        Ok(HttpResponse::new(
            200,
            r#"[{"id":"a1f3","title":"A","completed":false},{"id":2,"title":"B","completed":true},{"id":"7","title":"C","completed":false}]"#,
        )),
    );
    let listed: Vec<TodoId> = vm.todos().iter().map(|t| t.id.clone()).collect();
    assert_eq!(
        listed,
        vec![TodoId::Text("a1f3".into()), TodoId::Number(2), TodoId::Number(7)]
    );
    assert!(renders.borrow().last().unwrap().incomplete.contains(r#"data-id="a1f3""#));

    let remove = single(
        vm.handle(UiEvent::Click {
            command: Command::Delete,
            id: "a1f3".parse().unwrap(),
            input: None,
        })
        .dispatch,
    );
    assert_eq!(remove.request.path, "http://localhost:3000/todos/a1f3");
    vm.complete(remove.ticket, Ok(HttpResponse::new(200, "{}")));
    assert_eq!(ids(&vm), vec![2, 7]);

    // "7" from the DOM matches the numeric-string id from the server.
    let remove = single(
        vm.handle(UiEvent::Click {
            command: Command::Delete,
            id: "7".parse().unwrap(),
            input: None,
        })
        .dispatch,
    );
    vm.complete(remove.ticket, Ok(HttpResponse::new(200, "{}")));
    assert_eq!(ids(&vm), vec![2]);
}

#[test]
fn older_success_is_kept_when_newer_update_fails() {
    let (mut vm, _renders) = seeded();
    vm.handle(click(Command::Edit, 1));
    let first = single(
        vm.handle(UiEvent::Click {
            command: Command::Submit,
            id: TodoId::Number(1),
            input: Some("first".into()),
        })
        .dispatch,
    );
    let second = single(
        vm.handle(UiEvent::Click {
            command: Command::Submit,
            id: TodoId::Number(1),
            input: Some("second".into()),
        })
        .dispatch,
    );

    vm.complete(first.ticket, Ok(HttpResponse::new(200, "")));
    assert_eq!(vm.todos()[0].title, "first");
    let reaction = vm.complete(second.ticket, Ok(HttpResponse::new(500, "")));
    assert!(matches!(reaction.notice, Some(Notice::Log(_))));

    assert_eq!(vm.todos()[0].title, "first");
    assert!(!vm.todos()[0].editable);
}

#[test]
fn older_success_after_newer_failure_still_applies() {
    let (mut vm, _renders) = seeded();
    let first = single(vm.handle(click(Command::Toggle, 1)).dispatch);
    let second = single(vm.handle(click(Command::Toggle, 1)).dispatch);

    vm.complete(second.ticket, Err(TransportError("reset".into())));
    vm.complete(first.ticket, Ok(HttpResponse::new(200, "")));

    assert!(vm.todos()[0].completed);
}
