/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Number of slots in the transposition table. Must be a power of two.
macro_rules! ttable_capacity {
    () => {
        1 << 20
    };
}
pub(crate) use ttable_capacity;

/// Branching-factor estimate used for time management before two full
/// iterations have completed. Deliberately pessimistic, since a deep move
/// handed back by the transposition table can skew the early samples.
macro_rules! conservative_branch_factor {
    () => {
        20
    };
}
pub(crate) use conservative_branch_factor;
