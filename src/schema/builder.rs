// Schema construction for the Fulmen schema system
//
// The builder compiles a type description into an immutable schema model.
// Construction is deterministic: the same description and registry state
// always yield a structurally identical model. Recursion terminates by type
// identity; a repeated record lands in the model's table once and every
// further occurrence becomes a by-name reference.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::internal::error::ConstructionError;
use crate::schema::descriptor::{DescribeFn, MemberDescription, TypeDescription, TypeKind, TypeRef};
use crate::schema::surrogate::{SurrogateEntry, SurrogateRegistry};
use crate::schema::types::{
    EnumSchema, FieldSchema, PrimitiveKind, RecordSchema, Schema, SchemaModel, SurrogateHook,
    UnionSchema,
};

/// Compiles type descriptions into schema models, consulting a surrogate
/// registry for every described type it encounters.
#[derive(Debug)]
pub struct SchemaBuilder {
    registry: Arc<SurrogateRegistry>,
}

/// Per-build bookkeeping. Records are tracked by native type identity so
/// that recursion and repetition resolve without re-deriving schemas.
#[derive(Default)]
struct BuildContext {
    /// Records currently being built, by native id, with the name a
    /// back-reference should use.
    in_progress: HashMap<TypeId, String>,
    /// Records already in the table, by native id.
    completed: HashMap<TypeId, String>,
    /// Unions currently being built; re-entering one is a cycle.
    unions_in_progress: HashMap<TypeId, String>,
    completed_unions: HashMap<TypeId, Arc<UnionSchema>>,
    completed_enums: HashMap<TypeId, Arc<EnumSchema>>,
    /// The model's record table.
    records: HashMap<String, Arc<RecordSchema>>,
    /// Which native id owns each record name; a second id claiming the same
    /// name is a duplicate.
    record_owner: HashMap<String, TypeId>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    /// Creates a builder with an empty surrogate registry.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(SurrogateRegistry::new()),
        }
    }

    /// Creates a builder that consults the given registry.
    pub fn with_registry(registry: Arc<SurrogateRegistry>) -> Self {
        Self { registry }
    }

    /// Compiles a type description into a schema model.
    pub fn build(&self, description: &TypeDescription) -> Result<SchemaModel, ConstructionError> {
        let mut ctx = BuildContext::default();
        let root = self.build_description(description, &mut ctx)?;
        debug!(
            "built schema for '{}' with {} named record(s)",
            description.name,
            ctx.records.len()
        );
        Ok(SchemaModel::new(root, ctx.records))
    }

    fn build_description(
        &self,
        desc: &TypeDescription,
        ctx: &mut BuildContext,
    ) -> Result<Schema, ConstructionError> {
        // A record seen before, finished or not, resolves by name.
        if let Some(name) = ctx.in_progress.get(&desc.id) {
            return Ok(Schema::Ref(name.clone()));
        }
        if let Some(name) = ctx.completed.get(&desc.id) {
            return Ok(Schema::Ref(name.clone()));
        }
        // Unions have no by-name form, so re-entering one mid-build cannot
        // terminate.
        if let Some(union_name) = ctx.unions_in_progress.get(&desc.id) {
            return Err(ConstructionError::UnionVariantCycle {
                union: union_name.clone(),
                variant: desc.name.clone(),
            });
        }
        if let Some(union) = ctx.completed_unions.get(&desc.id) {
            return Ok(Schema::Union(union.clone()));
        }
        if let Some(en) = ctx.completed_enums.get(&desc.id) {
            return Ok(Schema::Enum(en.clone()));
        }

        // Surrogate substitution is total: every described type consults the
        // registry before anything else is decided about it.
        if let Some(entry) = self.registry.lookup(desc.id) {
            return self.build_surrogate(desc, &entry, ctx);
        }

        match &desc.kind {
            TypeKind::Record {
                members,
                constructible,
            } => {
                if !constructible {
                    return Err(ConstructionError::MissingSurrogate {
                        type_name: desc.name.clone(),
                    });
                }
                self.build_record(desc.id, &desc.name, members, None, ctx)
            }
            TypeKind::Union { variants } => self.build_union(desc, variants, ctx),
            TypeKind::Enum { symbols } => {
                let en = Arc::new(EnumSchema {
                    name: desc.name.clone(),
                    symbols: symbols.clone(),
                });
                ctx.completed_enums.insert(desc.id, en.clone());
                Ok(Schema::Enum(en))
            }
        }
    }

    /// Builds the stand-in record for a surrogate-redirected type and stamps
    /// the conversion pair onto it. The resulting record is keyed under the
    /// native type's identity so every further occurrence shares it.
    fn build_surrogate(
        &self,
        desc: &TypeDescription,
        entry: &SurrogateEntry,
        ctx: &mut BuildContext,
    ) -> Result<Schema, ConstructionError> {
        let standin = (entry.description)();
        let (members, constructible) = match &standin.kind {
            TypeKind::Record {
                members,
                constructible,
            } => (members, *constructible),
            _ => {
                return Err(ConstructionError::SurrogateNotRecord {
                    type_name: desc.name.clone(),
                    surrogate: standin.name.clone(),
                })
            }
        };
        if !constructible {
            return Err(ConstructionError::MissingSurrogate {
                type_name: standin.name.clone(),
            });
        }

        let hook = SurrogateHook {
            to_surrogate: entry.to_surrogate.clone(),
            from_surrogate: entry.from_surrogate.clone(),
        };
        self.build_record(desc.id, &standin.name, members, Some(hook), ctx)
    }

    fn build_record(
        &self,
        id: TypeId,
        name: &str,
        members: &[MemberDescription],
        hook: Option<SurrogateHook>,
        ctx: &mut BuildContext,
    ) -> Result<Schema, ConstructionError> {
        // Record names are unique across the graph; a second native type
        // claiming an existing name is a collision.
        if let Some(owner) = ctx.record_owner.get(name) {
            if *owner != id {
                return Err(ConstructionError::DuplicateRecordName {
                    name: name.to_string(),
                });
            }
        }
        ctx.record_owner.insert(name.to_string(), id);
        ctx.in_progress.insert(id, name.to_string());

        // If any member carries an explicit inclusion marker, only marked
        // members participate; otherwise every member does.
        let explicit = members.iter().any(|m| m.data_member);
        let mut fields = Vec::new();
        for member in members {
            if explicit && !member.data_member {
                continue;
            }
            fields.push(FieldSchema {
                name: member.name.clone(),
                schema: self.build_member(member, ctx)?,
            });
        }

        ctx.in_progress.remove(&id);
        ctx.completed.insert(id, name.to_string());

        let record = Arc::new(RecordSchema {
            name: name.to_string(),
            fields,
            hook,
        });
        ctx.records.insert(name.to_string(), record.clone());
        Ok(Schema::Record(record))
    }

    fn build_member(
        &self,
        member: &MemberDescription,
        ctx: &mut BuildContext,
    ) -> Result<Schema, ConstructionError> {
        let schema = self.build_type_ref(&member.ty, ctx)?;
        // The marker forces a nullable shape; an already-nullable shape
        // stays a single layer.
        if member.nullable_schema && !matches!(schema, Schema::Nullable(_)) {
            return Ok(Schema::Nullable(Box::new(schema)));
        }
        Ok(schema)
    }

    fn build_type_ref(
        &self,
        ty: &TypeRef,
        ctx: &mut BuildContext,
    ) -> Result<Schema, ConstructionError> {
        match ty {
            TypeRef::Primitive(kind) => Ok(Schema::Primitive(*kind)),
            TypeRef::Optional(inner) => {
                let schema = self.build_type_ref(inner, ctx)?;
                // Nullable never nests: absent and present are the only
                // states.
                if matches!(schema, Schema::Nullable(_)) {
                    Ok(schema)
                } else {
                    Ok(Schema::Nullable(Box::new(schema)))
                }
            }
            TypeRef::Sequence(inner) => {
                Ok(Schema::Sequence(Box::new(self.build_type_ref(inner, ctx)?)))
            }
            TypeRef::Map(inner) => Ok(Schema::Map(Box::new(self.build_type_ref(inner, ctx)?))),
            // Bit-flags travel as their combined integer value, never as
            // symbol ordinals.
            TypeRef::Flags => Ok(Schema::Primitive(PrimitiveKind::Int64)),
            TypeRef::Described(describe) => self.build_description(&describe(), ctx),
        }
    }

    fn build_union(
        &self,
        desc: &TypeDescription,
        variants: &[DescribeFn],
        ctx: &mut BuildContext,
    ) -> Result<Schema, ConstructionError> {
        if variants.is_empty() {
            return Err(ConstructionError::EmptyUnion {
                union: desc.name.clone(),
            });
        }

        ctx.unions_in_progress.insert(desc.id, desc.name.clone());
        let mut resolved = Vec::with_capacity(variants.len());
        for describe in variants {
            let variant_desc = describe();
            let schema = self.build_description(&variant_desc, ctx)?;
            let record = match schema {
                Schema::Record(record) => record,
                // A by-name result is fine as long as the record is finished;
                // a reference into an unfinished record is a cycle through
                // the variant list.
                Schema::Ref(ref name) => ctx.records.get(name).cloned().ok_or_else(|| {
                    ConstructionError::UnionVariantCycle {
                        union: desc.name.clone(),
                        variant: variant_desc.name.clone(),
                    }
                })?,
                _ => {
                    return Err(ConstructionError::UnionVariantNotRecord {
                        union: desc.name.clone(),
                        variant: variant_desc.name.clone(),
                    })
                }
            };
            resolved.push(record);
        }
        ctx.unions_in_progress.remove(&desc.id);

        let union = Arc::new(UnionSchema {
            name: desc.name.clone(),
            variants: resolved,
        });
        ctx.completed_unions.insert(desc.id, union.clone());
        Ok(Schema::Union(union))
    }
}
