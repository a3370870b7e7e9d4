use userreg_core::controller::{ADD_LABEL, EMPTY_TABLE_MESSAGE, UPDATE_LABEL};
use userreg_core::{
    FixedClock, FormSurface, MemoryBlobStore, Mode, NoticeLevel, PasswordVisibility,
    PromptSurface, RegistryController, SqliteBlobStore, TableSurface, UserFields, UserId,
    UserRow, UserStore, USERS_KEY,
};

#[derive(Debug, Default)]
struct RecordingView {
    form: UserFields,
    focus_count: usize,
    submit_label: String,
    password_visibility: Option<PasswordVisibility>,
    rows: Vec<(usize, UserId, String)>,
    placeholder: Option<String>,
    count_label: Option<usize>,
    confirm_answer: bool,
    confirm_prompts: usize,
    notices: Vec<(NoticeLevel, String)>,
}

impl RecordingView {
    fn type_fields(&mut self, name: &str, email: &str, mobile: &str, password: &str) {
        self.form = UserFields::new(name, email, mobile, password);
    }

    fn last_notice(&self) -> (NoticeLevel, &str) {
        let (level, message) = self.notices.last().expect("a notice");
        (*level, message.as_str())
    }

    fn names(&self) -> Vec<&str> {
        self.rows.iter().map(|(_, _, name)| name.as_str()).collect()
    }
}

impl FormSurface for RecordingView {
    fn read_fields(&mut self) -> UserFields {
        self.form.clone()
    }

    fn fill_fields(&mut self, fields: &UserFields) {
        self.form = fields.clone();
    }

    fn clear_fields(&mut self) {
        self.form = UserFields::default();
    }

    fn focus_first_field(&mut self) {
        self.focus_count += 1;
    }

    fn set_submit_label(&mut self, label: &str) {
        self.submit_label = label.to_string();
    }

    fn set_password_visibility(&mut self, visibility: PasswordVisibility) {
        self.password_visibility = Some(visibility);
    }
}

impl TableSurface for RecordingView {
    fn render_rows(&mut self, rows: &[UserRow<'_>]) {
        self.placeholder = None;
        self.rows = rows
            .iter()
            .map(|row| (row.position, row.id, row.name.to_string()))
            .collect();
    }

    fn render_empty(&mut self, message: &str) {
        self.rows.clear();
        self.placeholder = Some(message.to_string());
    }

    fn set_count_label(&mut self, count: usize) {
        self.count_label = Some(count);
    }
}

impl PromptSurface for RecordingView {
    fn confirm(&mut self, _message: &str) -> bool {
        self.confirm_prompts += 1;
        self.confirm_answer
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        self.notices.push((level, message.to_string()));
    }
}

type TestController = RegistryController<MemoryBlobStore, RecordingView, FixedClock>;

fn controller_with(blob: MemoryBlobStore) -> TestController {
    let store = UserStore::with_clock(blob, FixedClock::new(1_700_000_000_000));
    let mut controller = RegistryController::new(store, RecordingView::default());
    controller.init();
    controller
}

fn controller() -> TestController {
    controller_with(MemoryBlobStore::new())
}

fn add(controller: &mut TestController, name: &str, email: &str, mobile: &str) -> UserId {
    controller
        .view_mut()
        .type_fields(name, email, mobile, "secret");
    controller.submit();
    controller
        .store()
        .users()
        .last()
        .map(|user| user.id)
        .expect("user added")
}

#[test]
fn init_renders_persisted_users() {
    let blob = r#"[
        {"id":1,"name":"Alice","email":"alice@x.com","mobile":"9876543210","password":"pw1"},
        {"id":2,"name":"Bob","email":"bob@x.com","mobile":"1234567890","password":"pw2"}
    ]"#;
    let controller = controller_with(MemoryBlobStore::with_entry(USERS_KEY, blob));

    let view = controller.view();
    assert_eq!(
        view.rows,
        vec![
            (1, UserId(1), "Alice".to_string()),
            (2, UserId(2), "Bob".to_string()),
        ]
    );
    assert_eq!(view.count_label, Some(2));
    assert_eq!(view.submit_label, ADD_LABEL);
    assert_eq!(view.password_visibility, Some(PasswordVisibility::Masked));
    assert_eq!(controller.mode(), Mode::Create);
}

#[test]
fn init_with_empty_storage_renders_placeholder() {
    let controller = controller();

    let view = controller.view();
    assert!(view.rows.is_empty());
    assert_eq!(view.placeholder.as_deref(), Some(EMPTY_TABLE_MESSAGE));
    assert_eq!(view.count_label, Some(0));
}

#[test]
fn submit_in_create_mode_adds_and_resets_form() {
    let mut controller = controller();
    controller
        .view_mut()
        .type_fields(" Alice ", "alice@x.com", "9876543210", "pw1");
    controller.submit();

    let stored = &controller.store().users()[0];
    assert_eq!(stored.name, "Alice");

    let view = controller.view();
    assert_eq!(view.names(), vec!["Alice"]);
    assert_eq!(view.count_label, Some(1));
    assert_eq!(view.form, UserFields::default());
    assert_eq!(view.focus_count, 1);
    assert_eq!(
        view.last_notice(),
        (NoticeLevel::Info, "User added successfully!")
    );
}

#[test]
fn submit_with_invalid_input_keeps_form_and_collection() {
    let mut controller = controller();

    let cases = [
        (("", "a@x.com", "9876543210"), "Please fill all fields"),
        (("Ann", "ann.x.com", "9876543210"), "Please enter a valid email"),
        (
            ("Ann", "ann@x.com", "98765"),
            "Please enter a valid 10-digit mobile number",
        ),
    ];

    for ((name, email, mobile), expected) in cases {
        controller
            .view_mut()
            .type_fields(name, email, mobile, "pw");
        controller.submit();

        let view = controller.view();
        assert_eq!(view.last_notice(), (NoticeLevel::Error, expected));
        assert_eq!(view.form, UserFields::new(name, email, mobile, "pw"));
        assert!(controller.store().is_empty());
    }
    assert_eq!(controller.view().focus_count, 0);
}

#[test]
fn edit_then_submit_updates_and_returns_to_create_mode() {
    let mut controller = controller();
    let id = add(&mut controller, "Alice", "alice@x.com", "9876543210");

    controller.edit(id);
    assert_eq!(controller.mode(), Mode::Update(id));
    assert_eq!(controller.view().submit_label, UPDATE_LABEL);
    assert_eq!(controller.view().form.email, "alice@x.com");
    assert_eq!(controller.view().form.password, "secret");

    controller.view_mut().form.name = "Alicia".to_string();
    controller.submit();

    assert_eq!(controller.mode(), Mode::Create);
    assert_eq!(controller.store().len(), 1);
    assert_eq!(controller.store().get(id).unwrap().name, "Alicia");

    let view = controller.view();
    assert_eq!(view.names(), vec!["Alicia"]);
    assert_eq!(view.submit_label, ADD_LABEL);
    assert_eq!(view.form, UserFields::default());
    assert_eq!(
        view.last_notice(),
        (NoticeLevel::Info, "User updated successfully!")
    );
}

#[test]
fn failed_update_stays_in_update_mode() {
    let mut controller = controller();
    let id = add(&mut controller, "Alice", "alice@x.com", "9876543210");

    controller.edit(id);
    controller.view_mut().form.mobile = "12".to_string();
    controller.submit();

    assert_eq!(controller.mode(), Mode::Update(id));
    assert_eq!(controller.view().form.mobile, "12");
    assert_eq!(controller.store().get(id).unwrap().mobile, "9876543210");
    assert_eq!(controller.view().last_notice().0, NoticeLevel::Error);
}

#[test]
fn edit_unknown_id_reports_error_and_keeps_create_mode() {
    let mut controller = controller();
    controller.edit(UserId(99));

    assert_eq!(controller.mode(), Mode::Create);
    assert_eq!(
        controller.view().last_notice(),
        (NoticeLevel::Error, "User 99 no longer exists")
    );
}

#[test]
fn delete_requires_confirmation() {
    let mut controller = controller();
    let id = add(&mut controller, "Alice", "alice@x.com", "9876543210");

    controller.view_mut().confirm_answer = false;
    controller.delete(id);
    assert_eq!(controller.view().confirm_prompts, 1);
    assert_eq!(controller.store().len(), 1);

    controller.view_mut().confirm_answer = true;
    controller.delete(id);
    assert!(controller.store().is_empty());

    let view = controller.view();
    assert_eq!(view.placeholder.as_deref(), Some(EMPTY_TABLE_MESSAGE));
    assert_eq!(view.count_label, Some(0));
    assert_eq!(
        view.last_notice(),
        (NoticeLevel::Info, "User deleted successfully!")
    );
}

#[test]
fn deleting_the_user_being_edited_returns_to_create_mode() {
    let mut controller = controller();
    let id = add(&mut controller, "Alice", "alice@x.com", "9876543210");
    controller.edit(id);

    controller.view_mut().confirm_answer = true;
    controller.delete(id);

    assert_eq!(controller.mode(), Mode::Create);
    assert_eq!(controller.view().form, UserFields::default());
}

#[test]
fn search_shows_filtered_count_and_positions() {
    let mut controller = controller();
    add(&mut controller, "Alice", "alice@x.com", "9876543210");
    add(&mut controller, "Bob", "bob@x.com", "1234567890");
    add(&mut controller, "Bobby", "bobby@y.org", "5555555555");

    controller.search("BOB");
    let view = controller.view();
    assert_eq!(view.names(), vec!["Bob", "Bobby"]);
    assert_eq!(
        view.rows.iter().map(|row| row.0).collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert_eq!(view.count_label, Some(2));
    assert_eq!(controller.store().len(), 3);

    controller.search("nobody");
    assert_eq!(
        controller.view().placeholder.as_deref(),
        Some(EMPTY_TABLE_MESSAGE)
    );
    assert_eq!(controller.view().count_label, Some(0));

    controller.search("");
    assert_eq!(controller.view().count_label, Some(3));
}

#[test]
fn adding_while_filtered_keeps_the_filter() {
    let mut controller = controller();
    add(&mut controller, "Alice", "alice@x.com", "9876543210");
    controller.search("alice");

    add(&mut controller, "Bob", "bob@x.com", "1234567890");

    assert_eq!(controller.search_term(), "alice");
    assert_eq!(controller.view().names(), vec!["Alice"]);
    assert_eq!(controller.view().count_label, Some(1));
    assert_eq!(controller.store().len(), 2);
}

#[test]
fn clear_form_leaves_update_mode() {
    let mut controller = controller();
    let id = add(&mut controller, "Alice", "alice@x.com", "9876543210");
    controller.edit(id);

    controller.clear_form();

    assert_eq!(controller.mode(), Mode::Create);
    assert_eq!(controller.view().submit_label, ADD_LABEL);
    assert_eq!(controller.view().form, UserFields::default());

    controller
        .view_mut()
        .type_fields("Bob", "bob@x.com", "1234567890", "pw2");
    controller.submit();
    assert_eq!(controller.store().len(), 2);
    assert_eq!(controller.store().get(id).unwrap().name, "Alice");
}

#[test]
fn toggle_password_visibility_flips_display_only() {
    let mut controller = controller();
    controller
        .view_mut()
        .type_fields("Alice", "alice@x.com", "9876543210", "pw1");

    controller.toggle_password_visibility();
    assert_eq!(controller.password_visibility(), PasswordVisibility::Plain);
    assert_eq!(
        controller.view().password_visibility,
        Some(PasswordVisibility::Plain)
    );
    assert_eq!(controller.view().form.password, "pw1");

    controller.toggle_password_visibility();
    assert_eq!(
        controller.view().password_visibility,
        Some(PasswordVisibility::Masked)
    );
}

#[test]
fn update_of_user_removed_by_another_session_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("userreg.db");

    let store = UserStore::with_clock(
        SqliteBlobStore::open(&path).unwrap(),
        FixedClock::new(1_000),
    );
    let mut controller = RegistryController::new(store, RecordingView::default());
    controller.init();
    controller
        .view_mut()
        .type_fields("Alice", "alice@x.com", "9876543210", "pw1");
    controller.submit();
    controller
        .view_mut()
        .type_fields("Bob", "bob@x.com", "1234567890", "pw2");
    controller.submit();
    let alice_id = controller.store().users()[0].id;
    controller.edit(alice_id);

    let mut other = UserStore::new(SqliteBlobStore::open(&path).unwrap());
    other.load();
    other.remove(alice_id).unwrap();

    controller.reload();
    assert_eq!(controller.mode(), Mode::Update(alice_id));
    controller.view_mut().form.name = "Alicia".to_string();
    controller.submit();

    assert_eq!(controller.mode(), Mode::Create);
    assert_eq!(controller.store().len(), 1);
    let view = controller.view();
    assert_eq!(
        view.last_notice(),
        (NoticeLevel::Error, "User 1000 no longer exists")
    );
    assert_eq!(view.form, UserFields::default());
    assert_eq!(view.submit_label, ADD_LABEL);
    assert_eq!(view.names(), vec!["Bob"]);
    assert_eq!(view.count_label, Some(1));
}

#[test]
fn reload_picks_up_users_added_by_another_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("userreg.db");

    let store = UserStore::new(SqliteBlobStore::open(&path).unwrap());
    let mut controller = RegistryController::new(store, RecordingView::default());
    controller.init();
    assert_eq!(controller.view().count_label, Some(0));

    let mut other = UserStore::new(SqliteBlobStore::open(&path).unwrap());
    other.load();
    other
        .add(UserFields::new("Carol", "carol@x.com", "5555555555", "pw"))
        .unwrap();

    controller.reload();
    assert_eq!(controller.view().names(), vec!["Carol"]);
    assert_eq!(controller.view().count_label, Some(1));
}
