// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

diesel::table! {
    certificates (id) {
        id -> Text,
        fingerprint -> Text,
        record -> Text,
    }
}

diesel::table! {
    state_meta (id) {
        id -> Integer,
        format_version -> Integer,
        saved_at -> Text,
        record_count -> BigInt,
    }
}

diesel::allow_tables_to_appear_in_same_query!(certificates, state_meta);
