// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Diesel schema definitions for the card store.
//!
//! All date columns are ISO-8601 `Text`; lexicographic comparison on them
//! matches date order, which the range queries rely on.

diesel::table! {
    periods (period_id) {
        period_id -> BigInt,
        name -> Text,
        period_kind -> Text,
        date_start -> Text,
        date_end -> Text,
        generation_end_date -> Text,
        assessment_end_date -> Text,
        bonus_payout_date -> Text,
    }
}

diesel::table! {
    employee_bonus_types (bonus_type_id) {
        bonus_type_id -> BigInt,
        bonus_key -> Text,
        name -> Text,
    }
}

diesel::table! {
    period_bonus_types (id) {
        id -> BigInt,
        period_id -> BigInt,
        bonus_type_id -> BigInt,
    }
}

diesel::table! {
    cards (card_id) {
        card_id -> BigInt,
        per_no -> Text,
        business_unit -> Text,
        period_id -> BigInt,
        bonus_type_id -> BigInt,
        date_start -> Text,
        date_end -> Text,
        state -> Text,
        status -> Text,
        stage -> Text,
        generation_task_id -> Nullable<Text>,
    }
}

diesel::table! {
    card_assessments (assessment_id) {
        assessment_id -> BigInt,
        card_id -> BigInt,
        assessment_status -> Text,
    }
}

diesel::table! {
    cards_stage_history (entry_id) {
        entry_id -> BigInt,
        card_id -> BigInt,
        stage -> Text,
        start_dt -> Text,
        end_dt -> Nullable<Text>,
    }
}

diesel::table! {
    cards_approval_history (entry_id) {
        entry_id -> BigInt,
        card_id -> BigInt,
        approver -> Text,
        decision -> Text,
        decided_at -> Text,
    }
}

diesel::joinable!(cards -> employee_bonus_types (bonus_type_id));
diesel::joinable!(cards -> periods (period_id));
diesel::joinable!(period_bonus_types -> periods (period_id));
diesel::joinable!(period_bonus_types -> employee_bonus_types (bonus_type_id));
diesel::joinable!(card_assessments -> cards (card_id));
diesel::joinable!(cards_stage_history -> cards (card_id));
diesel::joinable!(cards_approval_history -> cards (card_id));

diesel::allow_tables_to_appear_in_same_query!(
    periods,
    employee_bonus_types,
    period_bonus_types,
    cards,
    card_assessments,
    cards_stage_history,
    cards_approval_history,
);
