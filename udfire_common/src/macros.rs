/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */


/// chain of `if let` matches where each failed match returns its own fallback value, e.g.
/// ```ignore
/// if_let! {
///     Some(fname) = { fs::filename( &path) } else { ApiError::bad_request("invalid file name").into_response() },
///     true = { path.is_file() } else { ApiError::not_found(msg).into_response() } => {
///         serve( fname, path)
///     }
/// }
/// ```
#[macro_export]
macro_rules! if_let {
    { $p:pat = $x:block else $e:block => $r:expr } => {
        if let $p = $x { $r } else $e
    };
    { $p:pat = $x:block else $e:block , $($ts:tt)+ } => {
        if let $p = $x { $crate::if_let! { $($ts)+ } } else $e
    };
}
pub use if_let; // preserve 'macros' module across crates

/// syntactic sugar macro to define thiserror Error enums:
/// ```ignore
/// define_error!{ pub UdfireNetError =
///   IOError( #[from] std::io::Error ) : "IO error: {0}",
///   OpFailed(String) : "operation failed: {0}"
/// }
/// ```
/// will get expanded into
/// ```ignore
/// #[derive(thiserror::Error,Debug)]
/// pub enum UdfireNetError {
///     #[error("IO error: {0}")]
///     IOError(#[from] std::io::Error),
///
///     #[error("operation failed: {0}")]
///     OpFailed(String),
/// }
/// ```
/// the using crate needs a `thiserror` dependency
#[macro_export]
macro_rules! define_error {
    ($vis:vis $name:ident = $( $err_variant:ident ( $( $( #[$meta:meta] )? $field_type:ty),* ) : $msg_lit:literal ),* $(,)?) => {
        #[derive(::thiserror::Error,Debug)]
        $vis enum $name {
            $(
                #[error($msg_lit)]
                $err_variant ( $( $(#[$meta])? $field_type ),*  )
            ),*
        }
    }
}
pub use define_error;

/// syntactic sugar macro to expand into a struct with serde attribute macros
/// This mostly expands optional "[ attr,.. ]" groups into respective #[serde(attrs...)] container or field attribute macros
/// use like this:
/// ```ignore
/// define_serde_struct! {
///     pub CompositeQuery : Debug [deny_unknown_fields] =
///        pub area: Option<String>,
///        pub days: Option<u32> [default]
/// }
/// ```
/// the using module needs `serde::{Serialize,Deserialize}` in scope
#[macro_export]
macro_rules! define_serde_struct {
    ( $vis:vis $name:ident $( : $( $dt:ty),* )? $( [ $( $sopt:ident $(= $sx:literal)? ),* ] )? =
       $( $( #[$fmeta:meta] )? $fvis:vis $fname:ident: $ftype:ty $( [ $( $fopt:ident $(= $fx:literal)? ),* ] )? ),*  $(,)?) => {
        #[derive(Serialize,Deserialize $( $( , $dt)* )? )]
        $( #[serde( $( $sopt $( = $sx)? ),* ) ])?
        $vis struct $name {
            $(
                $( #[ $fmeta ] )?
                $( #[serde(  $( $fopt $( =$fx )?),*  )] )?
                $fvis $fname : $ftype
            ),*
        }
    }
}
pub use define_serde_struct;
