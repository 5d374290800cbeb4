// SPDX-License-Identifier: Apache-2.0

mod env;
mod sender;
mod wire;
