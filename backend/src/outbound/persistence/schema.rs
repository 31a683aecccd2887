//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Accounts created by social sign-in. `(social_id, social_provider)` is
    /// unique.
    users (id) {
        id -> Int8,
        social_id -> Varchar,
        social_provider -> Varchar,
        name -> Varchar,
        email -> Varchar,
        avatar_url -> Nullable<Text>,
        is_admin -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    locations (id) {
        id -> Int8,
        name -> Varchar,
        address -> Varchar,
        latitude -> Float8,
        longitude -> Float8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    activities (id) {
        id -> Int8,
        title -> Varchar,
        target_count -> Int4,
        location_id -> Int8,
        description -> Varchar,
        created_by -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// `status` is one of `open`, `closed`, `completed`, `cancelled`.
    matches (id) {
        id -> Int8,
        activity_id -> Int8,
        organizer_id -> Int8,
        match_time -> Timestamptz,
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per `(match_id, user_id)`.
    match_participants (id) {
        id -> Int8,
        match_id -> Int8,
        user_id -> Int8,
        status -> Varchar,
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per `(reviewer_id, reviewee_id, match_id)`.
    reviews (id) {
        id -> Int8,
        match_id -> Int8,
        reviewer_id -> Int8,
        reviewee_id -> Int8,
        score -> Int2,
        comment -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per `(review_id, user_id)`; `is_like` is flipped in place.
    review_likes (id) {
        id -> Int8,
        review_id -> Int8,
        user_id -> Int8,
        is_like -> Bool,
    }
}

diesel::table! {
    /// Only the SHA-256 hex digest of a refresh token is stored.
    refresh_tokens (id) {
        id -> Int8,
        user_id -> Int8,
        token_hash -> Varchar,
        expires_at -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(activities -> locations (location_id));
diesel::joinable!(matches -> activities (activity_id));
diesel::joinable!(match_participants -> matches (match_id));
diesel::joinable!(review_likes -> reviews (review_id));
diesel::joinable!(refresh_tokens -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    activities,
    locations,
    match_participants,
    matches,
    refresh_tokens,
    review_likes,
    reviews,
    users,
);
