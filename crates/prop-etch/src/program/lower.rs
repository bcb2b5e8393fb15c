//! Lowering from the SWC AST to the declaration model
//!
//! Walks the module body once and records declarations, members, JSDoc and
//! the import/export tables. Statements other than declarations are not
//! looked at.

use super::model::{
    Decl, DeclKind, ExportEntry, ImportBinding, Initializer, Member, MemberKind, SourceModule,
};
use super::source::{member_key_str, module_export_name, prop_name_str, str_value, ParsedModule};
use super::types::{
    FnParam, FunctionType, Keyword, LiteralType, MappedModifier, MappedType, TemplatePart,
    TsType, TupleElement, TypeOperator, TypeParam,
};
use crate::js_doc::JsDoc;
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::{Span, Spanned};
use std::sync::Arc;

/// Lower a parsed file
pub fn lower_module(parsed: &ParsedModule) -> SourceModule {
    let mut module = SourceModule::new(parsed.path());
    let Some(ast) = parsed.module() else {
        return module;
    };

    let lowerer = Lowerer { parsed };
    for item in &ast.body {
        match item {
            swc_ast::ModuleItem::ModuleDecl(decl) => lowerer.module_decl(&mut module, decl),
            swc_ast::ModuleItem::Stmt(swc_ast::Stmt::Decl(decl)) => {
                for decl in lowerer.decl(decl, &[]) {
                    module.declare(decl);
                }
            }
            swc_ast::ModuleItem::Stmt(_) => {}
        }
    }

    module
}

struct Lowerer<'a> {
    parsed: &'a ParsedModule,
}

impl Lowerer<'_> {
    /// JSDoc found in front of the first span that has one
    fn doc(&self, spans: &[Span]) -> JsDoc {
        self.parsed
            .jsdoc_for_spans(spans.iter().copied())
            .map(|text| JsDoc::parse(&text))
            .unwrap_or_default()
    }

    fn module_decl(&self, module: &mut SourceModule, decl: &swc_ast::ModuleDecl) {
        module.is_module = true;

        match decl {
            swc_ast::ModuleDecl::Import(import) => {
                let specifier = str_value(&import.src);
                module.mention(&specifier);

                for spec in &import.specifiers {
                    let (local, binding) = match spec {
                        swc_ast::ImportSpecifier::Named(named) => {
                            let local = named.local.sym.to_string();
                            let imported = named
                                .imported
                                .as_ref()
                                .map(module_export_name)
                                .unwrap_or_else(|| local.clone());
                            (
                                local,
                                ImportBinding::Named {
                                    specifier: specifier.clone(),
                                    imported,
                                },
                            )
                        }
                        swc_ast::ImportSpecifier::Default(default) => (
                            default.local.sym.to_string(),
                            ImportBinding::Named {
                                specifier: specifier.clone(),
                                imported: "default".to_string(),
                            },
                        ),
                        swc_ast::ImportSpecifier::Namespace(namespace) => (
                            namespace.local.sym.to_string(),
                            ImportBinding::Namespace {
                                specifier: specifier.clone(),
                            },
                        ),
                    };
                    module.imports.insert(local, binding);
                }
            }
            swc_ast::ModuleDecl::ExportDecl(export) => {
                // JSDoc is attached to the export span when the inner
                // declaration has none
                for decl in self.decl(&export.decl, &[export.span]) {
                    module.export(ExportEntry::Local {
                        exported: decl.name.clone(),
                        local: decl.name.clone(),
                    });
                    module.declare(decl);
                }
            }
            swc_ast::ModuleDecl::ExportDefaultDecl(export) => {
                let decl = match &export.decl {
                    swc_ast::DefaultDecl::Class(class) => {
                        let name = class
                            .ident
                            .as_ref()
                            .map(|i| i.sym.to_string())
                            .unwrap_or_else(|| "default".to_string());
                        self.class_decl(name, &class.class, &[export.span])
                    }
                    swc_ast::DefaultDecl::Fn(func) => Decl {
                        name: func
                            .ident
                            .as_ref()
                            .map(|i| i.sym.to_string())
                            .unwrap_or_else(|| "default".to_string()),
                        kind: DeclKind::Function,
                        doc: self.doc(&[func.function.span, export.span]),
                    },
                    swc_ast::DefaultDecl::TsInterfaceDecl(iface) => {
                        self.interface_decl(iface, &[export.span])
                    }
                };
                module.export(ExportEntry::Local {
                    exported: "default".to_string(),
                    local: decl.name.clone(),
                });
                module.declare(decl);
            }
            swc_ast::ModuleDecl::ExportDefaultExpr(export) => {
                let local = match export.expr.as_ref() {
                    swc_ast::Expr::Ident(i) => i.sym.to_string(),
                    _ => {
                        module.declare(Decl {
                            name: "default".to_string(),
                            kind: DeclKind::Variable { ty: None },
                            doc: self.doc(&[export.span]),
                        });
                        "default".to_string()
                    }
                };
                module.export(ExportEntry::Local {
                    exported: "default".to_string(),
                    local,
                });
            }
            swc_ast::ModuleDecl::ExportNamed(named) => {
                let specifier = named.src.as_ref().map(|src| str_value(src));
                if let Some(specifier) = &specifier {
                    module.mention(specifier);
                }

                for spec in &named.specifiers {
                    let entry = match (spec, &specifier) {
                        (swc_ast::ExportSpecifier::Named(n), None) => {
                            let local = module_export_name(&n.orig);
                            ExportEntry::Local {
                                exported: n
                                    .exported
                                    .as_ref()
                                    .map(module_export_name)
                                    .unwrap_or_else(|| local.clone()),
                                local,
                            }
                        }
                        (swc_ast::ExportSpecifier::Named(n), Some(specifier)) => {
                            let imported = module_export_name(&n.orig);
                            ExportEntry::From {
                                exported: n
                                    .exported
                                    .as_ref()
                                    .map(module_export_name)
                                    .unwrap_or_else(|| imported.clone()),
                                specifier: specifier.clone(),
                                imported,
                            }
                        }
                        (swc_ast::ExportSpecifier::Namespace(ns), Some(specifier)) => {
                            ExportEntry::Namespace {
                                exported: module_export_name(&ns.name),
                                specifier: specifier.clone(),
                            }
                        }
                        (swc_ast::ExportSpecifier::Default(default), Some(specifier)) => {
                            ExportEntry::From {
                                exported: default.exported.sym.to_string(),
                                specifier: specifier.clone(),
                                imported: "default".to_string(),
                            }
                        }
                        _ => continue,
                    };
                    module.export(entry);
                }
            }
            swc_ast::ModuleDecl::ExportAll(all) => {
                let specifier = str_value(&all.src);
                module.mention(&specifier);
                module.star_exports.push(specifier);
            }
            swc_ast::ModuleDecl::TsImportEquals(_)
            | swc_ast::ModuleDecl::TsExportAssignment(_)
            | swc_ast::ModuleDecl::TsNamespaceExport(_) => {}
        }
    }

    /// Lower one declaration; variable statements may declare several names
    fn decl(&self, decl: &swc_ast::Decl, outer: &[Span]) -> Vec<Decl> {
        match decl {
            swc_ast::Decl::Class(class) => {
                vec![self.class_decl(class.ident.sym.to_string(), &class.class, outer)]
            }
            swc_ast::Decl::Fn(func) => vec![Decl {
                name: func.ident.sym.to_string(),
                kind: DeclKind::Function,
                doc: self.doc(&with_outer(func.function.span, outer)),
            }],
            swc_ast::Decl::Var(var) => {
                let doc = self.doc(&with_outer(var.span, outer));
                var.decls
                    .iter()
                    .filter_map(|declarator| match &declarator.name {
                        swc_ast::Pat::Ident(binding) => Some(Decl {
                            name: binding.sym.to_string(),
                            kind: DeclKind::Variable {
                                ty: binding
                                    .type_ann
                                    .as_ref()
                                    .map(|t| self.lower_type(&t.type_ann)),
                            },
                            doc: doc.clone(),
                        }),
                        _ => None,
                    })
                    .collect()
            }
            swc_ast::Decl::TsInterface(iface) => vec![self.interface_decl(iface, outer)],
            swc_ast::Decl::TsTypeAlias(alias) => vec![Decl {
                name: alias.id.sym.to_string(),
                kind: DeclKind::TypeAlias {
                    ty: self.lower_type(&alias.type_ann),
                },
                doc: self.doc(&with_outer(alias.span, outer)),
            }],
            swc_ast::Decl::TsEnum(ts_enum) => vec![Decl {
                name: ts_enum.id.sym.to_string(),
                kind: DeclKind::Enum,
                doc: self.doc(&with_outer(ts_enum.span, outer)),
            }],
            swc_ast::Decl::TsModule(ts_module) => {
                if ts_module.global {
                    return Vec::new();
                }
                let name = match &ts_module.id {
                    swc_ast::TsModuleName::Ident(i) => i.sym.to_string(),
                    swc_ast::TsModuleName::Str(s) => str_value(s),
                };
                vec![Decl {
                    name,
                    kind: DeclKind::Namespace,
                    doc: self.doc(&with_outer(ts_module.span, outer)),
                }]
            }
            swc_ast::Decl::Using(_) => Vec::new(),
        }
    }

    fn interface_decl(&self, iface: &swc_ast::TsInterfaceDecl, outer: &[Span]) -> Decl {
        let members = iface
            .body
            .body
            .iter()
            .filter_map(|element| self.type_element(element))
            .map(Arc::new)
            .collect();

        Decl {
            name: iface.id.sym.to_string(),
            kind: DeclKind::Interface {
                extends: iface
                    .extends
                    .iter()
                    .map(|e| self.expr_with_type_args(&e.expr, e.type_args.as_deref()))
                    .collect(),
                members,
            },
            doc: self.doc(&with_outer(iface.span, outer)),
        }
    }

    fn class_decl(&self, name: String, class: &swc_ast::Class, outer: &[Span]) -> Decl {
        let mut members = Vec::new();

        for member in &class.body {
            match member {
                swc_ast::ClassMember::ClassProp(prop) if !prop.is_static => {
                    let Some(name) = prop_name_str(&prop.key) else {
                        continue;
                    };
                    members.push(Member {
                        name,
                        kind: MemberKind::Property,
                        optional: prop.is_optional,
                        readonly: prop.readonly,
                        ty: prop.type_ann.as_ref().map(|t| self.lower_type(&t.type_ann)),
                        initializer: prop.value.as_ref().map(|v| self.initializer(v)),
                        doc: self.doc(&decorated(prop.span, &prop.decorators)),
                    });
                }
                swc_ast::ClassMember::Method(method) if !method.is_static => {
                    let Some(name) = prop_name_str(&method.key) else {
                        continue;
                    };
                    let function = &method.function;
                    let (kind, ty) = match method.kind {
                        swc_ast::MethodKind::Method => {
                            (MemberKind::Method, Some(self.function_type(function)))
                        }
                        swc_ast::MethodKind::Getter => (
                            MemberKind::Getter,
                            function
                                .return_type
                                .as_ref()
                                .map(|t| self.lower_type(&t.type_ann)),
                        ),
                        swc_ast::MethodKind::Setter => (
                            MemberKind::Setter,
                            function
                                .params
                                .first()
                                .and_then(|p| self.pat_param(&p.pat, 0).ty),
                        ),
                    };
                    members.push(Member {
                        name,
                        kind,
                        optional: method.is_optional,
                        readonly: false,
                        ty,
                        initializer: None,
                        doc: self.doc(&decorated(method.span, &function.decorators)),
                    });
                }
                swc_ast::ClassMember::Constructor(ctor) => {
                    members.extend(ctor.params.iter().filter_map(|p| self.param_property(p)));
                }
                _ => {}
            }
        }

        let extends = class
            .super_class
            .as_ref()
            .map(|expr| self.expr_with_type_args(expr, class.super_type_params.as_deref()));

        let mut spans = decorated(class.span, &class.decorators);
        spans.extend_from_slice(outer);

        Decl {
            name,
            kind: DeclKind::Class {
                extends,
                members: members.into_iter().map(Arc::new).collect(),
            },
            doc: self.doc(&spans),
        }
    }

    /// Constructor parameter property, `constructor(public label: string)`
    fn param_property(&self, param: &swc_ast::ParamOrTsParamProp) -> Option<Member> {
        let swc_ast::ParamOrTsParamProp::TsParamProp(prop) = param else {
            return None;
        };

        let (binding, initializer) = match &prop.param {
            swc_ast::TsParamPropParam::Ident(binding) => (binding, None),
            swc_ast::TsParamPropParam::Assign(assign) => match assign.left.as_ref() {
                swc_ast::Pat::Ident(binding) => (binding, Some(self.initializer(&assign.right))),
                _ => return None,
            },
        };

        Some(Member {
            name: binding.sym.to_string(),
            kind: MemberKind::Property,
            optional: binding.optional,
            readonly: prop.readonly,
            ty: binding
                .type_ann
                .as_ref()
                .map(|t| self.lower_type(&t.type_ann)),
            initializer,
            doc: self.doc(&decorated(prop.span, &prop.decorators)),
        })
    }

    fn type_element(&self, element: &swc_ast::TsTypeElement) -> Option<Member> {
        match element {
            swc_ast::TsTypeElement::TsPropertySignature(prop) => Some(Member {
                name: member_key_str(&prop.key, prop.computed)?,
                kind: MemberKind::Property,
                optional: prop.optional,
                readonly: prop.readonly,
                ty: prop.type_ann.as_ref().map(|t| self.lower_type(&t.type_ann)),
                initializer: None,
                doc: self.doc(&[prop.span]),
            }),
            swc_ast::TsTypeElement::TsMethodSignature(method) => Some(Member {
                name: member_key_str(&method.key, method.computed)?,
                kind: MemberKind::Method,
                optional: method.optional,
                readonly: false,
                ty: Some(TsType::Function(Box::new(FunctionType {
                    type_params: self.type_params(method.type_params.as_deref()),
                    params: method
                        .params
                        .iter()
                        .enumerate()
                        .map(|(i, p)| self.fn_param(p, i))
                        .collect(),
                    return_type: method
                        .type_ann
                        .as_ref()
                        .map(|t| self.lower_type(&t.type_ann))
                        .unwrap_or_else(TsType::any),
                    is_constructor: false,
                }))),
                initializer: None,
                doc: self.doc(&[method.span]),
            }),
            swc_ast::TsTypeElement::TsGetterSignature(getter) => Some(Member {
                name: member_key_str(&getter.key, getter.computed)?,
                kind: MemberKind::Getter,
                optional: false,
                readonly: false,
                ty: getter
                    .type_ann
                    .as_ref()
                    .map(|t| self.lower_type(&t.type_ann)),
                initializer: None,
                doc: self.doc(&[getter.span]),
            }),
            swc_ast::TsTypeElement::TsSetterSignature(setter) => Some(Member {
                name: member_key_str(&setter.key, setter.computed)?,
                kind: MemberKind::Setter,
                optional: false,
                readonly: false,
                ty: self.fn_param(&setter.param, 0).ty,
                initializer: None,
                doc: self.doc(&[setter.span]),
            }),
            _ => None,
        }
    }

    fn function_type(&self, function: &swc_ast::Function) -> TsType {
        TsType::Function(Box::new(FunctionType {
            type_params: self.type_params(function.type_params.as_deref()),
            params: function
                .params
                .iter()
                .enumerate()
                .map(|(i, p)| self.pat_param(&p.pat, i))
                .collect(),
            return_type: function
                .return_type
                .as_ref()
                .map(|t| self.lower_type(&t.type_ann))
                .unwrap_or_else(TsType::any),
            is_constructor: false,
        }))
    }

    fn type_params(&self, params: Option<&swc_ast::TsTypeParamDecl>) -> Vec<TypeParam> {
        params
            .map(|p| {
                p.params
                    .iter()
                    .map(|param| TypeParam {
                        name: param.name.sym.to_string(),
                        constraint: param.constraint.as_ref().map(|c| self.lower_type(c)),
                        default: param.default.as_ref().map(|d| self.lower_type(d)),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn type_args(&self, args: Option<&swc_ast::TsTypeParamInstantiation>) -> Vec<TsType> {
        args.map(|a| a.params.iter().map(|t| self.lower_type(t)).collect())
            .unwrap_or_default()
    }

    /// Parameter of a function or method implementation
    fn pat_param(&self, pat: &swc_ast::Pat, index: usize) -> FnParam {
        match pat {
            swc_ast::Pat::Ident(binding) => FnParam {
                name: binding.sym.to_string(),
                optional: binding.optional,
                rest: false,
                ty: binding
                    .type_ann
                    .as_ref()
                    .map(|t| self.lower_type(&t.type_ann)),
            },
            swc_ast::Pat::Rest(rest) => {
                let mut param = self.pat_param(&rest.arg, index);
                param.rest = true;
                if let Some(ty) = &rest.type_ann {
                    param.ty = Some(self.lower_type(&ty.type_ann));
                }
                param
            }
            swc_ast::Pat::Assign(assign) => {
                let mut param = self.pat_param(&assign.left, index);
                param.optional = true;
                param
            }
            swc_ast::Pat::Array(array) => FnParam {
                name: format!("__{}", index),
                optional: array.optional,
                rest: false,
                ty: array
                    .type_ann
                    .as_ref()
                    .map(|t| self.lower_type(&t.type_ann)),
            },
            swc_ast::Pat::Object(object) => FnParam {
                name: format!("__{}", index),
                optional: object.optional,
                rest: false,
                ty: object
                    .type_ann
                    .as_ref()
                    .map(|t| self.lower_type(&t.type_ann)),
            },
            swc_ast::Pat::Expr(_) | swc_ast::Pat::Invalid(_) => FnParam {
                name: format!("__{}", index),
                optional: false,
                rest: false,
                ty: None,
            },
        }
    }

    /// Parameter of a function type or method signature
    fn fn_param(&self, param: &swc_ast::TsFnParam, index: usize) -> FnParam {
        match param {
            swc_ast::TsFnParam::Ident(binding) => FnParam {
                name: binding.sym.to_string(),
                optional: binding.optional,
                rest: false,
                ty: binding
                    .type_ann
                    .as_ref()
                    .map(|t| self.lower_type(&t.type_ann)),
            },
            swc_ast::TsFnParam::Rest(rest) => {
                let mut param = self.pat_param(&rest.arg, index);
                param.rest = true;
                if let Some(ty) = &rest.type_ann {
                    param.ty = Some(self.lower_type(&ty.type_ann));
                }
                param
            }
            swc_ast::TsFnParam::Array(array) => FnParam {
                name: format!("__{}", index),
                optional: array.optional,
                rest: false,
                ty: array
                    .type_ann
                    .as_ref()
                    .map(|t| self.lower_type(&t.type_ann)),
            },
            swc_ast::TsFnParam::Object(object) => FnParam {
                name: format!("__{}", index),
                optional: object.optional,
                rest: false,
                ty: object
                    .type_ann
                    .as_ref()
                    .map(|t| self.lower_type(&t.type_ann)),
            },
        }
    }

    /// Reference type of an `extends` clause
    fn expr_with_type_args(
        &self,
        expr: &swc_ast::Expr,
        type_args: Option<&swc_ast::TsTypeParamInstantiation>,
    ) -> TsType {
        match expr_name(expr) {
            Some(name) => TsType::Reference {
                name,
                type_args: self.type_args(type_args),
            },
            None => TsType::any(),
        }
    }

    fn initializer(&self, expr: &swc_ast::Expr) -> Initializer {
        match expr {
            swc_ast::Expr::Lit(lit) => match lit {
                swc_ast::Lit::Bool(b) => Initializer::Boolean(b.value),
                swc_ast::Lit::Num(n) => Initializer::Number(n.value),
                swc_ast::Lit::Str(s) => Initializer::String(str_value(s)),
                swc_ast::Lit::BigInt(b) => Initializer::BigInt(b.value.to_string()),
                swc_ast::Lit::Null(_) => Initializer::Null,
                _ => Initializer::Other,
            },
            swc_ast::Expr::Tpl(_) => Initializer::Template,
            swc_ast::Expr::Ident(i) if &*i.sym == "undefined" => Initializer::Undefined,
            swc_ast::Expr::Unary(unary) => match (unary.op, unary.arg.as_ref()) {
                (swc_ast::UnaryOp::Minus, swc_ast::Expr::Lit(swc_ast::Lit::Num(n))) => {
                    Initializer::Number(-n.value)
                }
                (swc_ast::UnaryOp::Void, _) => Initializer::Undefined,
                (swc_ast::UnaryOp::Bang, _) => Initializer::Typed(TsType::Keyword(Keyword::Boolean)),
                _ => Initializer::Other,
            },
            swc_ast::Expr::Array(_) => Initializer::Array,
            swc_ast::Expr::Object(object) if object.props.is_empty() => Initializer::EmptyObject,
            swc_ast::Expr::New(new) => match expr_name(&new.callee) {
                Some(name) => Initializer::New(name),
                None => Initializer::Other,
            },
            swc_ast::Expr::Paren(paren) => self.initializer(&paren.expr),
            swc_ast::Expr::TsAs(as_expr) => Initializer::Typed(self.lower_type(&as_expr.type_ann)),
            swc_ast::Expr::TsTypeAssertion(assertion) => {
                Initializer::Typed(self.lower_type(&assertion.type_ann))
            }
            swc_ast::Expr::TsSatisfies(satisfies) => self.initializer(&satisfies.expr),
            _ => Initializer::Other,
        }
    }

    /// Convert SWC TsType to the model type
    fn lower_type(&self, ty: &swc_ast::TsType) -> TsType {
        match ty {
            swc_ast::TsType::TsKeywordType(kw) => TsType::Keyword(match kw.kind {
                swc_ast::TsKeywordTypeKind::TsAnyKeyword => Keyword::Any,
                swc_ast::TsKeywordTypeKind::TsUnknownKeyword => Keyword::Unknown,
                swc_ast::TsKeywordTypeKind::TsNumberKeyword => Keyword::Number,
                swc_ast::TsKeywordTypeKind::TsObjectKeyword => Keyword::Object,
                swc_ast::TsKeywordTypeKind::TsBooleanKeyword => Keyword::Boolean,
                swc_ast::TsKeywordTypeKind::TsBigIntKeyword => Keyword::BigInt,
                swc_ast::TsKeywordTypeKind::TsStringKeyword => Keyword::String,
                swc_ast::TsKeywordTypeKind::TsSymbolKeyword => Keyword::Symbol,
                swc_ast::TsKeywordTypeKind::TsVoidKeyword => Keyword::Void,
                swc_ast::TsKeywordTypeKind::TsUndefinedKeyword => Keyword::Undefined,
                swc_ast::TsKeywordTypeKind::TsNullKeyword => Keyword::Null,
                swc_ast::TsKeywordTypeKind::TsNeverKeyword => Keyword::Never,
                swc_ast::TsKeywordTypeKind::TsIntrinsicKeyword => Keyword::Intrinsic,
            }),
            swc_ast::TsType::TsThisType(_) => TsType::This,
            swc_ast::TsType::TsFnOrConstructorType(fn_type) => {
                let (type_params, params, return_type, is_constructor) = match fn_type {
                    swc_ast::TsFnOrConstructorType::TsFnType(f) => {
                        (&f.type_params, &f.params, &f.type_ann, false)
                    }
                    swc_ast::TsFnOrConstructorType::TsConstructorType(c) => {
                        (&c.type_params, &c.params, &c.type_ann, true)
                    }
                };
                TsType::Function(Box::new(FunctionType {
                    type_params: self.type_params(type_params.as_deref()),
                    params: params
                        .iter()
                        .enumerate()
                        .map(|(i, p)| self.fn_param(p, i))
                        .collect(),
                    return_type: self.lower_type(&return_type.type_ann),
                    is_constructor,
                }))
            }
            swc_ast::TsType::TsTypeRef(reference) => TsType::Reference {
                name: entity_name(&reference.type_name),
                type_args: self.type_args(reference.type_params.as_deref()),
            },
            swc_ast::TsType::TsTypeQuery(query) => TsType::Query(match &query.expr_name {
                swc_ast::TsTypeQueryExpr::TsEntityName(entity) => entity_name(entity),
                swc_ast::TsTypeQueryExpr::Import(import) => {
                    format!("import(\"{}\")", str_value(&import.arg))
                }
            }),
            swc_ast::TsType::TsTypeLit(lit) => TsType::TypeLiteral(
                lit.members
                    .iter()
                    .filter_map(|m| self.type_element(m))
                    .map(Arc::new)
                    .collect(),
            ),
            swc_ast::TsType::TsArrayType(array) => {
                TsType::Array(Box::new(self.lower_type(&array.elem_type)))
            }
            swc_ast::TsType::TsTupleType(tuple) => TsType::Tuple(
                tuple
                    .elem_types
                    .iter()
                    .map(|element| TupleElement {
                        label: match &element.label {
                            Some(swc_ast::Pat::Ident(binding)) => Some(binding.sym.to_string()),
                            _ => None,
                        },
                        ty: self.lower_type(&element.ty),
                    })
                    .collect(),
            ),
            swc_ast::TsType::TsOptionalType(optional) => {
                TsType::Optional(Box::new(self.lower_type(&optional.type_ann)))
            }
            swc_ast::TsType::TsRestType(rest) => {
                TsType::Rest(Box::new(self.lower_type(&rest.type_ann)))
            }
            swc_ast::TsType::TsUnionOrIntersectionType(union_inter) => match union_inter {
                swc_ast::TsUnionOrIntersectionType::TsUnionType(u) => {
                    TsType::Union(u.types.iter().map(|t| self.lower_type(t)).collect())
                }
                swc_ast::TsUnionOrIntersectionType::TsIntersectionType(i) => {
                    TsType::Intersection(i.types.iter().map(|t| self.lower_type(t)).collect())
                }
            },
            swc_ast::TsType::TsConditionalType(cond) => TsType::Conditional {
                check: Box::new(self.lower_type(&cond.check_type)),
                extends: Box::new(self.lower_type(&cond.extends_type)),
                true_type: Box::new(self.lower_type(&cond.true_type)),
                false_type: Box::new(self.lower_type(&cond.false_type)),
            },
            swc_ast::TsType::TsInferType(infer) => {
                TsType::Infer(infer.type_param.name.sym.to_string())
            }
            swc_ast::TsType::TsParenthesizedType(paren) => self.lower_type(&paren.type_ann),
            swc_ast::TsType::TsTypeOperator(op) => TsType::Operator {
                operator: match op.op {
                    swc_ast::TsTypeOperatorOp::KeyOf => TypeOperator::KeyOf,
                    swc_ast::TsTypeOperatorOp::Unique => TypeOperator::Unique,
                    swc_ast::TsTypeOperatorOp::ReadOnly => TypeOperator::Readonly,
                },
                ty: Box::new(self.lower_type(&op.type_ann)),
            },
            swc_ast::TsType::TsIndexedAccessType(indexed) => TsType::IndexedAccess {
                object: Box::new(self.lower_type(&indexed.obj_type)),
                index: Box::new(self.lower_type(&indexed.index_type)),
            },
            swc_ast::TsType::TsMappedType(mapped) => TsType::Mapped(Box::new(MappedType {
                readonly: mapped.readonly.as_ref().map(mapped_modifier),
                type_param: mapped.type_param.name.sym.to_string(),
                constraint: mapped
                    .type_param
                    .constraint
                    .as_ref()
                    .map(|c| self.lower_type(c)),
                name_type: mapped.name_type.as_ref().map(|t| self.lower_type(t)),
                optional: mapped.optional.as_ref().map(mapped_modifier),
                ty: mapped.type_ann.as_ref().map(|t| self.lower_type(t)),
            })),
            swc_ast::TsType::TsLitType(lit) => TsType::Literal(match &lit.lit {
                swc_ast::TsLit::Str(s) => LiteralType::String(str_value(s)),
                swc_ast::TsLit::Number(n) => LiteralType::Number(n.value),
                swc_ast::TsLit::Bool(b) => LiteralType::Boolean(b.value),
                swc_ast::TsLit::BigInt(b) => LiteralType::BigInt(b.value.to_string()),
                swc_ast::TsLit::Tpl(tpl) => {
                    let mut parts = Vec::new();
                    for (i, quasi) in tpl.quasis.iter().enumerate() {
                        let text = quasi.raw.to_string();
                        if !text.is_empty() {
                            parts.push(TemplatePart::Text(text));
                        }
                        if let Some(ty) = tpl.types.get(i) {
                            parts.push(TemplatePart::Type(self.lower_type(ty)));
                        }
                    }
                    LiteralType::Template(parts)
                }
            }),
            swc_ast::TsType::TsTypePredicate(pred) => TsType::Predicate {
                asserts: pred.asserts,
                param: match &pred.param_name {
                    swc_ast::TsThisTypeOrIdent::TsThisType(_) => "this".to_string(),
                    swc_ast::TsThisTypeOrIdent::Ident(i) => i.sym.to_string(),
                },
                ty: pred
                    .type_ann
                    .as_ref()
                    .map(|t| Box::new(self.lower_type(&t.type_ann))),
            },
            swc_ast::TsType::TsImportType(import) => TsType::Import {
                argument: str_value(&import.arg),
                qualifier: import.qualifier.as_ref().map(entity_name),
                type_args: Vec::new(),
            },
        }
    }
}

/// The member span followed by the span of its first decorator
fn decorated(span: Span, decorators: &[swc_ast::Decorator]) -> Vec<Span> {
    let mut spans = vec![span];
    if let Some(first) = decorators.first() {
        spans.push(first.span());
    }
    spans
}

fn with_outer(span: Span, outer: &[Span]) -> Vec<Span> {
    let mut spans = vec![span];
    spans.extend_from_slice(outer);
    spans
}

fn mapped_modifier(modifier: &swc_ast::TruePlusMinus) -> MappedModifier {
    match modifier {
        swc_ast::TruePlusMinus::True => MappedModifier::Present,
        swc_ast::TruePlusMinus::Plus => MappedModifier::Plus,
        swc_ast::TruePlusMinus::Minus => MappedModifier::Minus,
    }
}

/// Format an entity name (e.g., Namespace.Type)
fn entity_name(name: &swc_ast::TsEntityName) -> String {
    match name {
        swc_ast::TsEntityName::Ident(i) => i.sym.to_string(),
        swc_ast::TsEntityName::TsQualifiedName(q) => {
            format!("{}.{}", entity_name(&q.left), q.right.sym)
        }
    }
}

/// Dotted name of an identifier or member chain, `None` for anything else
fn expr_name(expr: &swc_ast::Expr) -> Option<String> {
    match expr {
        swc_ast::Expr::Ident(i) => Some(i.sym.to_string()),
        swc_ast::Expr::Member(member) => {
            let object = expr_name(&member.obj)?;
            match &member.prop {
                swc_ast::MemberProp::Ident(i) => Some(format!("{}.{}", object, i.sym)),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::source::parse_typescript_source;
    use pretty_assertions::assert_eq;

    fn lower(source: &str) -> SourceModule {
        let parsed = parse_typescript_source("/project/src/component.ts", source).unwrap();
        lower_module(&parsed)
    }

    fn single<'a>(module: &'a SourceModule, name: &str) -> &'a Decl {
        &module.declarations[name][0]
    }

    fn members(decl: &Decl) -> &[Arc<Member>] {
        match &decl.kind {
            DeclKind::Interface { members, .. } | DeclKind::Class { members, .. } => members,
            other => panic!("no members on {:?}", other),
        }
    }

    #[test]
    fn test_interface_members_and_docs() {
        let module = lower(
            r#"
/** Button props */
export interface Props {
    /** Label text */
    label: string;
    /**
     * Size
     * @default 12
     */
    size?: number;
    onClick(e: Event): void;
}
"#,
        );

        assert!(module.is_module);
        let props = single(&module, "Props");
        assert_eq!(props.doc.description, "Button props");

        let members = members(props);
        assert_eq!(members.len(), 3);
        assert_eq!(members[0].name, "label");
        assert_eq!(members[0].doc.description, "Label text");
        assert!(!members[0].optional);
        assert!(members[1].optional);
        assert_eq!(members[1].doc.tags[0].name, "default");
        assert_eq!(members[2].kind, MemberKind::Method);
        assert_eq!(
            members[2].ty.as_ref().unwrap().to_string(),
            "(e: Event) => void"
        );

        assert_eq!(
            module.exports,
            vec![ExportEntry::Local {
                exported: "Props".into(),
                local: "Props".into()
            }]
        );
    }

    #[test]
    fn test_decorated_class_members() {
        let module = lower(
            r#"
/**
 * @summary Switch
 */
export class GlSwitch {
    /** Form value */
    @property({ reflect: true }) value: boolean | string | number = true;

    /** Disabled */
    @property({ type: Boolean, reflect: true }) disabled = false;

    private secret: string = 'x';

    static styles = 'css';

    #hidden = 1;

    private get size_(): string | undefined {
        return undefined;
    }

    protected render() {}
}
"#,
        );

        let class = single(&module, "GlSwitch");
        assert_eq!(class.doc.tags[0].name, "summary");

        let members = members(class);
        let names: Vec<_> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["value", "disabled", "secret", "size_", "render"]);
        assert_eq!(members[0].doc.description, "Form value");
        assert_eq!(members[1].doc.description, "Disabled");
        assert_eq!(members[1].initializer, Some(Initializer::Boolean(false)));
        assert_eq!(members[3].kind, MemberKind::Getter);
        assert_eq!(members[4].kind, MemberKind::Method);
    }

    #[test]
    fn test_constructor_parameter_properties() {
        let module = lower(
            r#"
export class Chip {
    constructor(public readonly label: string, private tone = 'info', plain: number) {}
}
"#,
        );

        let members = members(single(&module, "Chip"));
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name, "label");
        assert!(members[0].readonly);
        assert_eq!(members[1].name, "tone");
        assert_eq!(members[1].initializer, Some(Initializer::String("info".into())));
    }

    #[test]
    fn test_export_tables() {
        let module = lower(
            r#"
import { Base as Root } from './base';
import Theme from './theme';
import * as icons from './icons';
import './side-effect';

interface Local {}
export { Local as Renamed };
export { Shared } from './shared';
export * from './all';
export * as ns from './ns';
export default class {}
"#,
        );

        assert_eq!(
            module.imports["Root"],
            ImportBinding::Named {
                specifier: "./base".into(),
                imported: "Base".into()
            }
        );
        assert_eq!(
            module.imports["Theme"],
            ImportBinding::Named {
                specifier: "./theme".into(),
                imported: "default".into()
            }
        );
        assert_eq!(
            module.imports["icons"],
            ImportBinding::Namespace {
                specifier: "./icons".into()
            }
        );

        let exported: Vec<_> = module.exports.iter().map(|e| e.exported()).collect();
        assert_eq!(exported, vec!["Renamed", "Shared", "ns", "default"]);
        assert_eq!(module.star_exports, vec!["./all".to_string()]);
        assert_eq!(
            module.specifiers,
            vec!["./base", "./theme", "./icons", "./side-effect", "./shared", "./all", "./ns"]
        );
        assert!(module.declarations.contains_key("default"));
    }

    #[test]
    fn test_script_without_module_syntax() {
        let module = lower("interface Props { a: string }");
        assert!(!module.is_module);
        assert!(module.declarations.contains_key("Props"));
    }

    #[test]
    fn test_declare_global_is_skipped() {
        let module = lower(
            r#"
export class GlKidIcon {}
declare global {
    interface HTMLElementTagNameMap {
        'gl-kid-icon': GlKidIcon;
    }
}
"#,
        );
        assert_eq!(module.declarations.len(), 1);
    }

    #[test]
    fn test_type_lowering() {
        let module = lower(
            r#"
export type A = (string | number)[];
export type B = { readonly a: 'x'; b?: `px-${number}` };
export type C = [EIconType, string, ...number[]];
export type D = keyof typeof config;
export type E = Partial<Record<string, () => void>>;
"#,
        );

        let alias = |name: &str| match &single(&module, name).kind {
            DeclKind::TypeAlias { ty } => ty.to_string(),
            other => panic!("not an alias: {:?}", other),
        };

        assert_eq!(alias("A"), "(string | number)[]");
        assert_eq!(alias("B"), r#"{ readonly a: "x"; b?: `px-${number}`; }"#);
        assert_eq!(alias("C"), "[EIconType, string, ...number[]]");
        assert_eq!(alias("D"), "keyof typeof config");
        assert_eq!(alias("E"), "Partial<Record<string, () => void>>");
    }
}
