/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{error::Error, fmt};

pub trait KGraphError {
    fn variant_name(&self) -> &'static str;

    fn component(&self) -> &'static str;

    fn code(&self) -> &'static str;

    fn code_prefix(&self) -> &'static str;

    fn code_number(&self) -> usize;

    fn format_description(&self) -> String;

    fn source(&self) -> Option<&(dyn Error + Sync)>;

    fn source_kgraph_error(&self) -> Option<&(dyn KGraphError + Sync)>;

    fn root_source_kgraph_error(&self) -> &(dyn KGraphError + Sync)
    where
        Self: Sized + Sync,
    {
        let mut error: &(dyn KGraphError + Sync) = self;
        while let Some(source) = error.source_kgraph_error() {
            error = source;
        }
        error
    }

    fn format_code_and_description(&self) -> String {
        format!("[{}] {}", self.code(), self.format_description())
    }
}

impl PartialEq for dyn KGraphError {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for dyn KGraphError {}

impl fmt::Debug for dyn KGraphError + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for dyn KGraphError + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = self.source_kgraph_error() {
            write!(f, "[{}] {}\nCause: \n\t {:?}", self.code(), self.format_description(), source as &dyn KGraphError)
        } else if let Some(source) = self.source() {
            write!(f, "[{}] {}\nCause: \n\t {:?}", self.code(), self.format_description(), source)
        } else {
            write!(f, "{}", self.format_code_and_description())
        }
    }
}

// Do not declare both `source` and `kgraph_source` on one variant: `kgraph_source` takes precedence.
#[macro_export]
macro_rules! kgraph_error {
    ( $vis: vis $name:ident(component = $component: literal, prefix = $prefix: literal) { $(
        $variant: ident (
            $number: literal,
            $description: literal
            $(, $payload_name: ident : $payload_type: ty )*
            $(, ( source : $source: ty ) )?
            $(, ( kgraph_source : $kgraph_source: ty ) )?
        ),
    )*}) => {
        #[derive(Clone)]
        $vis enum $name {
            $(
                $variant { $(source: $source, )? $(kgraph_source: $kgraph_source, )? $($payload_name: $payload_type, )* },
            )*
        }

        impl $name {
            const _VALIDATE_NUMBERS: () = {
                #[deny(unreachable_patterns)] // fail to compile if any Numbers are the same
                match 0 {
                    $(
                        $number => (),
                    )*
                    _ => (),
               }
           };
        }

        impl $crate::KGraphError for $name {
            fn variant_name(&self) -> &'static str {
                match self {
                    $(
                        Self::$variant { .. } => &stringify!($variant),
                    )*
                }
            }

            fn component(&self) -> &'static str {
                &$component
            }

            fn code(&self) -> &'static str {
                match self {
                    $(
                        Self::$variant { .. } => & concat!($prefix, stringify!($number)),
                    )*
                }
            }

            fn code_prefix(&self) -> &'static str {
                $prefix
            }

            fn code_number(&self) -> usize {
                match self {
                    $(
                        Self::$variant { .. } => $number,
                    )*
                }
            }

            #[allow(unused_variables)]
            fn format_description(&self) -> String {
                match self {
                    $(
                        Self::$variant { $( $payload_name, )* .. } => format!($description),
                    )*
                }
            }

            fn source(&self) -> Option<&(dyn ::std::error::Error + Sync + 'static)> {
                let error = match self {
                    $(
                        $(Self::$variant { source, .. } => {
                            let source: &$source = source;
                            Some(source as &(dyn ::std::error::Error + Sync))
                        })?
                    )*
                    _ => None
                };
                error
            }

            fn source_kgraph_error(&self) -> Option<&(dyn $crate::KGraphError + Sync + 'static)> {
                let error = match self {
                    $(
                        $(Self::$variant { kgraph_source, .. } => {
                            let kgraph_source: &$kgraph_source = kgraph_source;
                            Some(kgraph_source as &(dyn $crate::KGraphError + Sync))
                        })?
                    )*
                    _ => None
                };
                error
            }
        }

        impl ::std::fmt::Debug for $name {
           fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Debug::fmt(self as &dyn $crate::KGraphError, f)
            }
        }

        impl ::std::fmt::Display for $name {
           fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(self as &dyn $crate::KGraphError, f)
            }
        }
    };
}
