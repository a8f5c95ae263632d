// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Macro front-ends over [`Router::log`](crate::Router::log) and
//! [`Router::logt`](crate::Router::logt).

/// Delivers a formatted record to the always-on target class.
///
/// An invocation without payload arguments is a silent no-op.
///
/// ```no_run
/// # let router = tagroute::Router::new(tagroute::Config::default()).unwrap();
/// tagroute::log!(router, "{} downloads complete", 42);
/// ```
#[macro_export]
macro_rules! log {
    ($router:expr $(,)?) => {{
        let _ = &$router;
    }};
    ($router:expr, $($arg:tt)+) => {
        $router.log(::core::format_args!($($arg)+))
    };
}

/// Delivers a formatted record to every target matching the given tags, and
/// to the always-on class, each exactly once.
///
/// Tags may be a single string or an array of strings. An invocation
/// without payload arguments is a silent no-op.
///
/// ```no_run
/// # let router = tagroute::Router::new(tagroute::Config::default()).unwrap();
/// tagroute::logt!(router, "verbose", "download progress: {}%", 48);
/// tagroute::logt!(router, ["error", "info"], "failed to parse {}", "data.json");
/// ```
#[macro_export]
macro_rules! logt {
    ($router:expr, $tags:expr $(,)?) => {{
        let _ = &$router;
        let _ = $tags;
    }};
    ($router:expr, $tags:expr, $($arg:tt)+) => {
        $router.logt($tags, ::core::format_args!($($arg)+))
    };
}
