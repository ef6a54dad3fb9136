use tally_api::v1::{Todo, TodoFields};

use crate::{
    api::RemoteTodos,
    error::ValidationError,
    notify::{Notifier, Toast},
    store::TodoStore,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Text,
    UserId,
}

/// A check on one field. Each rule names the field it applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    /// Text has at least this many characters.
    TextMinChars(usize),
    /// User id is at least this much.
    UserIdAtLeast(i64),
}

impl Rule {
    pub fn field(self) -> Field {
        match self {
            Rule::TextMinChars(_) => Field::Text,
            Rule::UserIdAtLeast(_) => Field::UserId,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Constraint {
    pub rule: Rule,
    pub message: &'static str,
}

/// Swappable so the form can be tested against other schemas.
pub const TODO_SCHEMA: &[Constraint] = &[
    Constraint {
        rule: Rule::TextMinChars(1),
        message: "Todo description is required",
    },
    Constraint {
        rule: Rule::UserIdAtLeast(1),
        message: "User ID must be at least 1",
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

/// Raw form input. `user_id` is signed since the input box accepts any number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormValues {
    pub text: String,
    pub completed: bool,
    pub user_id: i64,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            text: String::new(),
            completed: false,
            user_id: 1,
        }
    }
}

impl From<&Todo> for FormValues {
    fn from(todo: &Todo) -> Self {
        Self {
            text: todo.text.clone(),
            completed: todo.completed,
            user_id: i64::try_from(todo.user_id).unwrap_or(i64::MAX),
        }
    }
}

impl FormValues {
    pub fn validate(&self, schema: &[Constraint]) -> Result<TodoFields, ValidationError> {
        let mut errors: Vec<_> = schema
            .iter()
            .filter(|constraint| !self.satisfies(constraint))
            .map(|constraint| FieldError {
                field: constraint.rule.field(),
                message: constraint.message,
            })
            .collect();

        let user_id = u64::try_from(self.user_id).ok();
        if user_id.is_none() && !errors.iter().any(|e| e.field == Field::UserId) {
            errors.push(FieldError {
                field: Field::UserId,
                message: "User ID must be a positive number",
            });
        }

        match (errors.is_empty(), user_id) {
            (true, Some(user_id)) => Ok(TodoFields {
                text: self.text.clone(),
                completed: self.completed,
                user_id,
            }),
            _ => Err(ValidationError { errors }),
        }
    }

    fn satisfies(&self, constraint: &Constraint) -> bool {
        match constraint.rule {
            Rule::TextMinChars(min) => self.text.chars().count() >= min,
            Rule::UserIdAtLeast(min) => self.user_id >= min,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(u64),
}

#[derive(Clone, Debug)]
pub struct TodoForm {
    mode: FormMode,
    schema: &'static [Constraint],
    initial: FormValues,
    pub values: FormValues,
    errors: Vec<FieldError>,
    open: bool,
    submitting: bool,
}

impl TodoForm {
    pub fn create() -> Self {
        Self::new(FormMode::Create, FormValues::default())
    }

    pub fn edit(todo: &Todo) -> Self {
        Self::new(FormMode::Edit(todo.id), FormValues::from(todo))
    }

    fn new(mode: FormMode, initial: FormValues) -> Self {
        Self {
            mode,
            schema: TODO_SCHEMA,
            values: initial.clone(),
            initial,
            errors: Vec::new(),
            open: true,
            submitting: false,
        }
    }

    pub fn with_schema(mut self, schema: &'static [Constraint]) -> Self {
        self.schema = schema;
        self
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn error_for(&self, field: Field) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add New Todo",
            FormMode::Edit(_) => "Edit Todo",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match (self.submitting, self.mode) {
            (true, _) => "Saving...",
            (false, FormMode::Create) => "Create",
            (false, FormMode::Edit(_)) => "Update",
        }
    }

    /// Validates the input and hands it to the store.
    ///
    /// On success the form closes and resets. On failure it stays open with
    /// the input intact and an error toast is raised. Validation errors are
    /// kept on the form and never reach the store.
    pub async fn submit<R, N>(&mut self, store: &TodoStore<R>, notifier: &N) -> Option<Todo>
    where
        R: RemoteTodos,
        N: Notifier,
    {
        let fields = match self.values.validate(self.schema) {
            Ok(fields) => fields,
            Err(err) => {
                self.errors = err.errors;
                return None;
            }
        };

        self.errors.clear();
        self.submitting = true;

        let result = match self.mode {
            FormMode::Create => store.add(fields).await,
            FormMode::Edit(id) => store.edit(id, fields).await,
        };

        self.submitting = false;

        match result {
            Ok(todo) => {
                notifier.notify(match self.mode {
                    FormMode::Create => Toast::success("Todo added!"),
                    FormMode::Edit(_) => Toast::success("Todo updated!"),
                });

                if let FormMode::Edit(_) = self.mode {
                    self.initial = FormValues::from(&todo);
                }

                self.open = false;
                self.values = self.initial.clone();

                Some(todo)
            }
            Err(_) => {
                notifier.notify(Toast::failure());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        notify::{RecordingNotifier, ToastKind},
        testing::{todo, MockRemote},
    };

    fn values(text: &str, user_id: i64) -> FormValues {
        FormValues {
            text: text.to_owned(),
            completed: false,
            user_id,
        }
    }

    #[test]
    fn valid_input_becomes_fields() {
        let fields = values("buy milk", 3).validate(TODO_SCHEMA).unwrap();

        assert_eq!(fields.text, "buy milk");
        assert_eq!(fields.user_id, 3);
    }

    #[test]
    fn empty_text_and_zero_user_are_rejected() {
        let err = values("", 0).validate(TODO_SCHEMA).unwrap_err();

        assert_eq!(
            err.errors,
            [
                FieldError {
                    field: Field::Text,
                    message: "Todo description is required",
                },
                FieldError {
                    field: Field::UserId,
                    message: "User ID must be at least 1",
                },
            ]
        );
    }

    #[test]
    fn schema_is_swappable() {
        const STRICT: &[Constraint] = &[
            Constraint {
                rule: Rule::TextMinChars(5),
                message: "Too short",
            },
            Constraint {
                rule: Rule::UserIdAtLeast(10),
                message: "Too small",
            },
        ];

        let err = values("milk", 3).validate(STRICT).unwrap_err();
        assert_eq!(
            err.errors,
            [
                FieldError {
                    field: Field::Text,
                    message: "Too short",
                },
                FieldError {
                    field: Field::UserId,
                    message: "Too small",
                },
            ]
        );

        assert!(values("", 1).validate(&[]).is_ok());
    }

    #[test]
    fn each_rule_checks_its_own_field() {
        assert_eq!(Rule::TextMinChars(1).field(), Field::Text);
        assert_eq!(Rule::UserIdAtLeast(1).field(), Field::UserId);

        const USER_ONLY: &[Constraint] = &[Constraint {
            rule: Rule::UserIdAtLeast(2),
            message: "Too small",
        }];

        // an empty text is not caught by a user id rule
        assert!(values("", 2).validate(USER_ONLY).is_ok());
        let err = values("milk", 1).validate(USER_ONLY).unwrap_err();
        assert_eq!(err.errors[0].field, Field::UserId);
    }

    #[tokio::test]
    async fn form_uses_its_own_schema() {
        const LENIENT: &[Constraint] = &[];

        let store = TodoStore::new(MockRemote::with_next_id(1));
        let notifier = RecordingNotifier::default();

        let mut form = TodoForm::create().with_schema(LENIENT);
        let added = form.submit(&store, &notifier).await.unwrap();

        assert_eq!(added.text, "");
        assert!(form.errors().is_empty());
    }

    #[test]
    fn negative_user_is_rejected_without_schema() {
        let err = values("milk", -2).validate(&[]).unwrap_err();
        assert_eq!(err.errors[0].field, Field::UserId);
    }

    #[test]
    fn create_form_defaults() {
        let form = TodoForm::create();

        assert_eq!(form.values, values("", 1));
        assert_eq!(form.title(), "Add New Todo");
        assert_eq!(form.submit_label(), "Create");
        assert!(form.is_open());
    }

    #[test]
    fn edit_form_is_prefilled() {
        let form = TodoForm::edit(&todo(2, "walk dog", true, 4));

        assert_eq!(form.mode(), FormMode::Edit(2));
        assert_eq!(form.values.text, "walk dog");
        assert!(form.values.completed);
        assert_eq!(form.values.user_id, 4);
        assert_eq!(form.title(), "Edit Todo");
        assert_eq!(form.submit_label(), "Update");
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_store() {
        let store = TodoStore::new(MockRemote::default());
        let notifier = RecordingNotifier::default();

        let mut form = TodoForm::create();
        form.values.user_id = 0;

        assert!(form.submit(&store, &notifier).await.is_none());
        assert_eq!(store.remote().calls(), 0);
        assert_eq!(form.error_for(Field::Text), Some("Todo description is required"));
        assert!(form.is_open());
        assert!(notifier.toasts().is_empty());
    }

    #[tokio::test]
    async fn successful_create_closes_and_resets() {
        let store = TodoStore::new(MockRemote::with_next_id(3));
        let notifier = RecordingNotifier::default();

        let mut form = TodoForm::create();
        form.values = values("new task", 5);

        let added = form.submit(&store, &notifier).await.unwrap();

        assert_eq!(added.id, 3);
        assert!(!form.is_open());
        assert_eq!(form.values, FormValues::default());
        assert_eq!(notifier.toasts(), [Toast::success("Todo added!")]);
    }

    #[tokio::test]
    async fn failed_update_keeps_form_open_with_input() {
        let remote = MockRemote::default();
        remote.fail_next(1);
        let store = TodoStore::new(remote);
        store.initialize(vec![todo(2, "walk dog", false, 1)]);
        let notifier = RecordingNotifier::default();

        let mut form = TodoForm::edit(&todo(2, "walk dog", false, 1));
        form.values.text = String::from("walk cat");

        assert!(form.submit(&store, &notifier).await.is_none());
        assert!(form.is_open());
        assert!(!form.is_submitting());
        assert_eq!(form.values.text, "walk cat");
        assert_eq!(store.get(2), Some(todo(2, "walk dog", false, 1)));

        let toasts = notifier.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastKind::Error);
    }
}
