//! Diesel schema for task persistence.

diesel::table! {
    /// Task records owned by projects.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Owning project identifier.
        project_id -> Uuid,
        /// Creator's user identifier.
        creator_id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional free-text description.
        description -> Nullable<Text>,
        /// Board status.
        #[max_length = 20]
        status -> Varchar,
        /// Priority level.
        #[max_length = 20]
        priority -> Varchar,
        /// Optional assignee user identifier.
        assignee_id -> Nullable<Uuid>,
        /// Optional deadline.
        deadline -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
