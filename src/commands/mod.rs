// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod expenses;
pub mod incomes;
pub mod budgets;
pub mod loans;
pub mod reports;
pub mod assistant;
pub mod currency;
pub mod doctor;
