//! Tree-walking interpreter for directive conditions.
//!
//! Works directly on the `swc_ecma_ast::Expr` produced by the parser. Only the
//! side-effect-free subset of JavaScript that conditions are written in is
//! supported; everything else is an error, which the caller treats as `false`.

use anyhow::{Result, anyhow, bail};
use swc_ecma_ast::{
    BinaryOp, Callee, Expr, ExprOrSpread, Lit, MemberExpr, MemberProp, OptChainBase, Tpl, UnaryOp,
};

use super::value::{Value, join};
use crate::core::data::SymbolTable;

/// Evaluation context for one expression. Holds nothing but a view of the symbols.
pub(super) struct Interpreter<'a> {
    symbols: &'a SymbolTable,
}

impl<'a> Interpreter<'a> {
    pub(super) fn new(symbols: &'a SymbolTable) -> Self {
        Self { symbols }
    }

    pub(super) fn eval(&self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Lit(lit) => Self::eval_lit(lit),
            Expr::Ident(ident) => self.lookup(ident.sym.as_str()),
            Expr::Paren(paren) => self.eval(&paren.expr),
            Expr::Unary(unary) => self.eval_unary(unary.op, &unary.arg),
            Expr::Bin(bin) => self.eval_binary(bin.op, &bin.left, &bin.right),
            Expr::Cond(cond) => {
                if self.eval(&cond.test)?.truthy() {
                    self.eval(&cond.cons)
                } else {
                    self.eval(&cond.alt)
                }
            }
            Expr::Seq(seq) => {
                let mut last = Value::Undefined;
                for expr in &seq.exprs {
                    last = self.eval(expr)?;
                }
                Ok(last)
            }
            Expr::Tpl(tpl) => self.eval_template(tpl),
            Expr::Array(array) => {
                let mut items = Vec::with_capacity(array.elems.len());
                for elem in &array.elems {
                    match elem {
                        Some(elem) => items.push(self.eval_arg(elem)?),
                        None => items.push(Value::Undefined),
                    }
                }
                Ok(Value::Array(items))
            }
            Expr::Member(_) | Expr::Call(_) | Expr::OptChain(_) => {
                Ok(self.eval_chain(expr)?.unwrap_or(Value::Undefined))
            }
            _ => bail!("unsupported expression"),
        }
    }

    fn eval_lit(lit: &Lit) -> Result<Value> {
        match lit {
            Lit::Str(s) => s
                .value
                .as_str()
                .map(|s| Value::String(s.to_string()))
                .ok_or_else(|| anyhow!("string literal is not valid UTF-8")),
            Lit::Bool(b) => Ok(Value::Bool(b.value)),
            Lit::Null(_) => Ok(Value::Null),
            Lit::Num(n) => Ok(Value::Number(n.value)),
            _ => bail!("unsupported literal"),
        }
    }

    fn lookup(&self, name: &str) -> Result<Value> {
        if let Some(value) = self.symbols.get(name) {
            return Ok(Value::from(value));
        }
        match name {
            "undefined" => Ok(Value::Undefined),
            "NaN" => Ok(Value::Number(f64::NAN)),
            "Infinity" => Ok(Value::Number(f64::INFINITY)),
            _ => bail!("{} is not defined", name),
        }
    }

    fn eval_arg(&self, arg: &ExprOrSpread) -> Result<Value> {
        if arg.spread.is_some() {
            bail!("spread arguments are not supported");
        }
        self.eval(&arg.expr)
    }

    fn eval_unary(&self, op: UnaryOp, arg: &Expr) -> Result<Value> {
        // `typeof UNDECLARED` is the one place an unknown name is not an error
        if op == UnaryOp::TypeOf
            && let Expr::Ident(ident) = arg
        {
            let value = self.lookup(ident.sym.as_str()).unwrap_or(Value::Undefined);
            return Ok(Value::String(value.type_of().to_string()));
        }

        let value = self.eval(arg)?;
        match op {
            UnaryOp::Bang => Ok(Value::Bool(!value.truthy())),
            UnaryOp::Minus => Ok(Value::Number(-value.to_number())),
            UnaryOp::Plus => Ok(Value::Number(value.to_number())),
            UnaryOp::Tilde => Ok(Value::Number(f64::from(!value.to_int32()))),
            UnaryOp::TypeOf => Ok(Value::String(value.type_of().to_string())),
            UnaryOp::Void => Ok(Value::Undefined),
            _ => bail!("unsupported operator {:?}", op),
        }
    }

    fn eval_binary(&self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<Value> {
        // Short-circuit operators return an operand, not a boolean
        match op {
            BinaryOp::LogicalAnd => {
                let l = self.eval(left)?;
                return if l.truthy() { self.eval(right) } else { Ok(l) };
            }
            BinaryOp::LogicalOr => {
                let l = self.eval(left)?;
                return if l.truthy() { Ok(l) } else { self.eval(right) };
            }
            BinaryOp::NullishCoalescing => {
                let l = self.eval(left)?;
                return if l.is_nullish() { self.eval(right) } else { Ok(l) };
            }
            _ => {}
        }

        let l = self.eval(left)?;
        let r = self.eval(right)?;

        let value = match op {
            BinaryOp::EqEq => Value::Bool(l.loose_equals(&r)),
            BinaryOp::NotEq => Value::Bool(!l.loose_equals(&r)),
            BinaryOp::EqEqEq => Value::Bool(l.strict_equals(&r)),
            BinaryOp::NotEqEq => Value::Bool(!l.strict_equals(&r)),
            BinaryOp::Lt => Value::Bool(l.compare(&r).is_some_and(|o| o.is_lt())),
            BinaryOp::LtEq => Value::Bool(l.compare(&r).is_some_and(|o| o.is_le())),
            BinaryOp::Gt => Value::Bool(l.compare(&r).is_some_and(|o| o.is_gt())),
            BinaryOp::GtEq => Value::Bool(l.compare(&r).is_some_and(|o| o.is_ge())),
            BinaryOp::Add => {
                let (l, r) = (l.to_primitive(), r.to_primitive());
                if matches!(l, Value::String(_)) || matches!(r, Value::String(_)) {
                    Value::String(l.to_js_string() + r.to_js_string().as_str())
                } else {
                    Value::Number(l.to_number() + r.to_number())
                }
            }
            BinaryOp::Sub => Value::Number(l.to_number() - r.to_number()),
            BinaryOp::Mul => Value::Number(l.to_number() * r.to_number()),
            BinaryOp::Div => Value::Number(l.to_number() / r.to_number()),
            BinaryOp::Mod => Value::Number(l.to_number() % r.to_number()),
            BinaryOp::Exp => Value::Number(l.to_number().powf(r.to_number())),
            BinaryOp::BitAnd => Value::Number(f64::from(l.to_int32() & r.to_int32())),
            BinaryOp::BitOr => Value::Number(f64::from(l.to_int32() | r.to_int32())),
            BinaryOp::BitXor => Value::Number(f64::from(l.to_int32() ^ r.to_int32())),
            BinaryOp::LShift => Value::Number(f64::from(
                l.to_int32().wrapping_shl(r.to_int32() as u32 & 31),
            )),
            BinaryOp::RShift => Value::Number(f64::from(
                l.to_int32().wrapping_shr(r.to_int32() as u32 & 31),
            )),
            BinaryOp::ZeroFillRShift => Value::Number(f64::from(
                (l.to_int32() as u32).wrapping_shr(r.to_int32() as u32 & 31),
            )),
            BinaryOp::In => {
                let key = l.to_js_string();
                match &r {
                    Value::Object(map) => Value::Bool(map.contains_key(&key)),
                    Value::Array(items) => Value::Bool(
                        key == "length" || key.parse::<usize>().is_ok_and(|i| i < items.len()),
                    ),
                    _ => bail!("cannot use 'in' operator on {}", r.type_of()),
                }
            }
            _ => bail!("unsupported operator {:?}", op),
        };
        Ok(value)
    }

    fn eval_template(&self, tpl: &Tpl) -> Result<Value> {
        let mut out = String::new();
        for (i, quasi) in tpl.quasis.iter().enumerate() {
            let cooked = quasi
                .cooked
                .as_ref()
                .and_then(|c| c.as_str())
                .ok_or_else(|| anyhow!("invalid template literal"))?;
            out.push_str(cooked);
            if let Some(expr) = tpl.exprs.get(i) {
                out.push_str(&self.eval(expr)?.to_js_string());
            }
        }
        Ok(Value::String(out))
    }

    /// Evaluate a member/call chain. `None` means an optional link short-circuited,
    /// which makes the whole chain `undefined`.
    fn eval_chain(&self, expr: &Expr) -> Result<Option<Value>> {
        match expr {
            Expr::Member(member) => self.eval_member(member, false),
            Expr::OptChain(chain) => match &*chain.base {
                OptChainBase::Member(member) => self.eval_member(member, chain.optional),
                OptChainBase::Call(call) => self.eval_call(&call.callee, &call.args),
            },
            Expr::Call(call) => match &call.callee {
                Callee::Expr(callee) => self.eval_call(callee, &call.args),
                _ => bail!("unsupported call"),
            },
            other => self.eval(other).map(Some),
        }
    }

    fn eval_member(&self, member: &MemberExpr, optional: bool) -> Result<Option<Value>> {
        let Some(object) = self.eval_chain(&member.obj)? else {
            return Ok(None);
        };
        if optional && object.is_nullish() {
            return Ok(None);
        }
        let key = self.property_key(&member.prop)?;
        get_property(&object, &key).map(Some)
    }

    fn eval_call(&self, callee: &Expr, args: &[ExprOrSpread]) -> Result<Option<Value>> {
        let (object, prop, optional) = match callee {
            Expr::Member(member) => (&member.obj, &member.prop, false),
            Expr::OptChain(chain) => match &*chain.base {
                OptChainBase::Member(member) => (&member.obj, &member.prop, chain.optional),
                OptChainBase::Call(_) => bail!("calling a call result is not supported"),
            },
            Expr::Ident(ident) => {
                let args = self.eval_args(args)?;
                return call_global(ident.sym.as_str(), &args).map(Some);
            }
            Expr::Paren(paren) => return self.eval_call(&paren.expr, args),
            _ => bail!("unsupported call target"),
        };

        let Some(receiver) = self.eval_chain(object)? else {
            return Ok(None);
        };
        if optional && receiver.is_nullish() {
            return Ok(None);
        }
        let method = self.property_key(prop)?;
        let args = self.eval_args(args)?;
        call_method(&receiver, &method, &args).map(Some)
    }

    fn eval_args(&self, args: &[ExprOrSpread]) -> Result<Vec<Value>> {
        args.iter().map(|arg| self.eval_arg(arg)).collect()
    }

    fn property_key(&self, prop: &MemberProp) -> Result<String> {
        match prop {
            MemberProp::Ident(ident) => Ok(ident.sym.as_str().to_string()),
            MemberProp::Computed(computed) => Ok(self.eval(&computed.expr)?.to_js_string()),
            MemberProp::PrivateName(_) => bail!("private names are not supported"),
        }
    }
}

fn get_property(object: &Value, key: &str) -> Result<Value> {
    let value = match object {
        Value::Undefined | Value::Null => {
            bail!(
                "cannot read properties of {} (reading '{}')",
                object.to_js_string(),
                key
            )
        }
        Value::String(s) if key == "length" => Value::Number(s.encode_utf16().count() as f64),
        Value::String(s) => key
            .parse::<usize>()
            .ok()
            .and_then(|i| s.encode_utf16().nth(i))
            .map_or(Value::Undefined, |unit| {
                Value::String(String::from_utf16_lossy(&[unit]))
            }),
        Value::Array(items) if key == "length" => Value::Number(items.len() as f64),
        Value::Array(items) => key
            .parse::<usize>()
            .ok()
            .and_then(|i| items.get(i).cloned())
            .unwrap_or(Value::Undefined),
        Value::Object(map) => map.get(key).cloned().unwrap_or(Value::Undefined),
        Value::Bool(_) | Value::Number(_) => Value::Undefined,
    };
    Ok(value)
}

fn string_arg(args: &[Value], index: usize) -> String {
    args.get(index)
        .map_or_else(|| "undefined".to_string(), Value::to_js_string)
}

fn call_method(receiver: &Value, method: &str, args: &[Value]) -> Result<Value> {
    if receiver.is_nullish() {
        bail!(
            "cannot read properties of {} (reading '{}')",
            receiver.to_js_string(),
            method
        );
    }

    let value = match (receiver, method) {
        (Value::String(s), "startsWith") => Value::Bool(s.starts_with(&string_arg(args, 0))),
        (Value::String(s), "endsWith") => Value::Bool(s.ends_with(&string_arg(args, 0))),
        (Value::String(s), "includes") => Value::Bool(s.contains(&string_arg(args, 0))),
        (Value::String(s), "indexOf") => {
            let needle = string_arg(args, 0);
            Value::Number(
                s.find(&needle)
                    .map_or(-1.0, |byte| s[..byte].encode_utf16().count() as f64),
            )
        }
        (Value::String(s), "toLowerCase") => Value::String(s.to_lowercase()),
        (Value::String(s), "toUpperCase") => Value::String(s.to_uppercase()),
        (Value::String(s), "trim") => Value::String(s.trim().to_string()),
        (Value::Array(items), "includes") => {
            let needle = args.first().cloned().unwrap_or(Value::Undefined);
            Value::Bool(items.iter().any(|item| item.same_value_zero(&needle)))
        }
        (Value::Array(items), "indexOf") => {
            let needle = args.first().cloned().unwrap_or(Value::Undefined);
            Value::Number(
                items
                    .iter()
                    .position(|item| item.strict_equals(&needle))
                    .map_or(-1.0, |i| i as f64),
            )
        }
        (Value::Array(items), "join") => {
            let separator = match args.first() {
                None | Some(Value::Undefined) => ",".to_string(),
                Some(sep) => sep.to_js_string(),
            };
            Value::String(join(items, &separator))
        }
        (_, "toString") => Value::String(receiver.to_js_string()),
        _ => bail!("{}.{} is not a function", receiver.type_of(), method),
    };
    Ok(value)
}

/// The conversion functions available without a receiver.
fn call_global(name: &str, args: &[Value]) -> Result<Value> {
    let arg = args.first().cloned().unwrap_or(Value::Undefined);
    match name {
        "Boolean" => Ok(Value::Bool(arg.truthy())),
        "Number" if args.is_empty() => Ok(Value::Number(0.0)),
        "Number" => Ok(Value::Number(arg.to_number())),
        "String" if args.is_empty() => Ok(Value::String(String::new())),
        "String" => Ok(Value::String(arg.to_js_string())),
        _ => bail!("{} is not a function", name),
    }
}
