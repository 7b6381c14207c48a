//! Diesel schema for project and membership persistence.

diesel::table! {
    /// Project records.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Project name.
        #[max_length = 255]
        name -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Creator's user identifier.
        creator_id -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Project membership records, unique per `(project_id, user_id)`.
    project_members (id) {
        /// Membership identifier.
        id -> Uuid,
        /// Project identifier.
        project_id -> Uuid,
        /// Member's user identifier.
        user_id -> Uuid,
        /// Member role.
        #[max_length = 20]
        role -> Varchar,
        /// Join timestamp.
        joined_at -> Timestamptz,
    }
}

diesel::joinable!(project_members -> projects (project_id));
diesel::allow_tables_to_appear_in_same_query!(projects, project_members);
