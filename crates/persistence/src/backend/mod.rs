// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Connection setup that Diesel's query DSL cannot express.
//!
//! Domain reads live in `queries/` and writes in `mutations/`.

pub mod sqlite;
