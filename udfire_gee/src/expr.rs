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


//! lazy Earth Engine expressions
//!
//! Nothing in here computes anything. An [`Expr`] is a tree of server side function invocations that gets
//! serialized into the Earth Engine REST `Expression` format, which is a flat table of value nodes:
//! ```text
//! { "result": "2",
//!   "values": {
//!     "0": { "functionInvocationValue": { "functionName": "Image.load", "arguments": { "id": { "constantValue": "X" }}}},
//!     "1": ...,
//!     "2": { "functionInvocationValue": { "functionName": "Image.add", "arguments": { "image1": { "valueReference": "0" }, ..}}}
//!   }
//! }
//! ```
//! Identical invocations are only stored once, and function definitions (the per-image algorithms we map over
//! collections) refer to their body by id.

use std::collections::{BTreeMap, HashMap};
use serde_json::{json, Map, Value};

#[derive(Debug,Clone,PartialEq)]
pub enum Expr {
    Constant(Value),
    Invocation { function: String, args: BTreeMap<String,Expr> },
    /// reference to a parameter of an enclosing function definition
    Argument(String),
    Function { params: Vec<String>, body: Box<Expr> },
    Array(Vec<Expr>),
    Dictionary(BTreeMap<String,Expr>),
}

impl Expr {
    pub fn constant (v: impl Into<Value>)->Self {
        Expr::Constant( v.into())
    }

    pub fn invoke<const N: usize> (function: &str, args: [(&str,Expr);N])->Self {
        let args = args.into_iter().map( |(k,v)| (k.to_string(), v)).collect();
        Expr::Invocation { function: function.to_string(), args }
    }

    /// name of the invoked server function if this is an invocation
    pub fn function_name (&self)->Option<&str> {
        match self {
            Expr::Invocation{function,..} => Some(function.as_str()),
            _ => None
        }
    }

    /// named argument of an invocation
    pub fn arg (&self, name: &str)->Option<&Expr> {
        match self {
            Expr::Invocation{args,..} => args.get(name),
            _ => None
        }
    }

    pub fn as_constant (&self)->Option<&Value> {
        match self {
            Expr::Constant(v) => Some(v),
            _ => None
        }
    }

    fn children (&self)->Vec<&Expr> {
        match self {
            Expr::Constant(_) | Expr::Argument(_) => Vec::new(),
            Expr::Invocation{args,..} => args.values().collect(),
            Expr::Function{body,..} => vec![body.as_ref()],
            Expr::Array(items) => items.iter().collect(),
            Expr::Dictionary(entries) => entries.values().collect(),
        }
    }

    /// depth-first list of all invocations of `function` within this expression (including self)
    pub fn find_invocations (&self, function: &str)->Vec<&Expr> {
        let mut found = Vec::new();
        self.collect_invocations( function, &mut found);
        found
    }

    fn collect_invocations<'a> (&'a self, function: &str, found: &mut Vec<&'a Expr>) {
        if self.function_name() == Some(function) { found.push(self) }
        for c in self.children() { c.collect_invocations( function, found) }
    }

    /// maximum nesting level of function definitions within this expression
    pub fn function_depth (&self)->usize {
        let child_depth = self.children().into_iter().map( |c| c.function_depth()).max().unwrap_or(0);
        match self {
            Expr::Function{..} => child_depth + 1,
            _ => child_depth
        }
    }

    /// a copy of self with all references to argument `from` renamed to `to`
    pub fn rename_argument (&self, from: &str, to: &str)->Expr {
        match self {
            Expr::Argument(name) if name == from => Expr::Argument(to.to_string()),
            Expr::Constant(_) | Expr::Argument(_) => self.clone(),
            Expr::Invocation{function,args} => Expr::Invocation {
                function: function.clone(),
                args: args.iter().map( |(k,v)| (k.clone(), v.rename_argument(from,to))).collect()
            },
            Expr::Function{params,body} => {
                if params.iter().any( |p| p == from) {
                    self.clone() // shadowed
                } else {
                    Expr::Function { params: params.clone(), body: Box::new( body.rename_argument(from,to)) }
                }
            }
            Expr::Array(items) => Expr::Array( items.iter().map( |e| e.rename_argument(from,to)).collect()),
            Expr::Dictionary(entries) => Expr::Dictionary( entries.iter().map( |(k,v)| (k.clone(), v.rename_argument(from,to))).collect()),
        }
    }

    /// serialize into an Earth Engine REST `Expression` object
    pub fn to_graph (&self)->Value {
        let mut gb = GraphBuilder::default();
        let result = gb.id_of( self);
        json!({ "result": result, "values": gb.values })
    }
}

#[derive(Default)]
struct GraphBuilder {
    values: Map<String,Value>,
    ids: HashMap<String,String>, // serialized node -> id
}

impl GraphBuilder {
    fn value_node (&mut self, e: &Expr)->Value {
        match e {
            Expr::Constant(v) => json!({ "constantValue": v }),
            Expr::Argument(name) => json!({ "argumentReference": name }),
            Expr::Array(items) => {
                let values: Vec<Value> = items.iter().map( |e| self.value_node(e)).collect();
                json!({ "arrayValue": { "values": values }})
            }
            Expr::Dictionary(entries) => {
                let mut values = Map::new();
                for (k,e) in entries { values.insert( k.clone(), self.value_node(e)); }
                json!({ "dictionaryValue": { "values": values }})
            }
            Expr::Invocation{function,args} => {
                let mut arguments = Map::new();
                for (k,e) in args { arguments.insert( k.clone(), self.value_node(e)); }
                let node = json!({ "functionInvocationValue": { "functionName": function, "arguments": arguments }});
                json!({ "valueReference": self.register(node) })
            }
            Expr::Function{params,body} => {
                let body_id = self.id_of( body);
                json!({ "functionDefinitionValue": { "argumentNames": params, "body": body_id }})
            }
        }
    }

    /// the values table id of `e`, adding it to the table if it isn't already a reference
    fn id_of (&mut self, e: &Expr)->String {
        let node = self.value_node(e);
        match node.get("valueReference").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => self.register(node)
        }
    }

    fn register (&mut self, node: Value)->String {
        let key = node.to_string();
        if let Some(id) = self.ids.get(&key) { return id.clone() }

        let id = self.values.len().to_string();
        self.values.insert( id.clone(), node);
        self.ids.insert( key, id.clone());
        id
    }
}
